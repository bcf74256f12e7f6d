//! The surface the auto-open loop needs from whatever is hosting it.
use std::fmt;

use bevy::math::Vec3;

use super::errors::HostError;

/// Class tag of the world objects the loop scans for.
pub const INTERACTIVE_OBJECT_CLASS: &str = "InteractiveObject";

/// Stable identity of a world object, used as the default cooldown key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(u64);

impl ObjectKey {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OBJ-{:08x}", self.0)
    }
}

/// The controllable entity, its controller and where it stands.
#[derive(Debug, Clone, Copy)]
pub struct PlayerContext<A> {
    pub pawn: A,
    pub controller: Option<A>,
    pub location: Option<Vec3>,
}

/// Argument shapes accepted by an object's `UsedBy` entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseArgs<A> {
    Pawn(A),
    PawnAndController(A, A),
}

/// Contract the host environment must satisfy.
///
/// Every method is a potential call into foreign state, so anything that can
/// go wrong on the host side comes back as a [`HostError`] instead of a panic.
pub trait AutoOpenHost {
    type Object: Copy;
    type Actor: Copy;

    /// Current player pawn, or `None` while there is nothing to control.
    fn player(&self) -> Option<PlayerContext<Self::Actor>>;

    /// All live instances of `class`.
    fn find_all(&self, class: &str) -> Result<Vec<Self::Object>, HostError>;

    /// Whether a previously returned handle still refers to a live object.
    fn is_valid(&self, object: Self::Object) -> bool;

    fn identity(&self, object: Self::Object) -> ObjectKey;

    fn location(&self, object: Self::Object) -> Option<Vec3>;

    /// Raw definition descriptor; `Ok(None)` when the object has none.
    fn definition(&self, object: Self::Object) -> Result<Option<String>, HostError>;

    fn display_name(&self, object: Self::Object) -> Option<String>;

    /// Type tag under which negotiated call shapes are cached.
    fn object_type(&self, object: Self::Object) -> String;

    fn used_by(
        &mut self,
        object: Self::Object,
        args: UseArgs<Self::Actor>,
    ) -> Result<(), HostError>;
}
