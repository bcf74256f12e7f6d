//! Interaction invocation with per-type call shape negotiation.
//!
//! Hosts disagree on whether `UsedBy` wants the pawn alone or the pawn plus
//! its controller. The first successful shape for an object type is cached so
//! later attempts on that type make a single call.
use std::{collections::HashMap, fmt};

use super::{
    errors::HostError,
    host::{AutoOpenHost, PlayerContext, UseArgs},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseSignature {
    Pawn,
    PawnAndController,
}

impl UseSignature {
    pub const PROBE_ORDER: [UseSignature; 2] = [UseSignature::Pawn, UseSignature::PawnAndController];

    /// Builds the arguments for this shape, if the player can supply them.
    pub fn args<A: Copy>(self, player: &PlayerContext<A>) -> Option<UseArgs<A>> {
        match self {
            Self::Pawn => Some(UseArgs::Pawn(player.pawn)),
            Self::PawnAndController => player
                .controller
                .map(|controller| UseArgs::PawnAndController(player.pawn, controller)),
        }
    }
}

impl fmt::Display for UseSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pawn => "pawn",
            Self::PawnAndController => "pawn+controller",
        };
        write!(f, "{}", label)
    }
}

/// Negotiated call shape per object type.
#[derive(Debug, Default)]
pub struct SignatureRegistry {
    negotiated: HashMap<String, UseSignature>,
}

impl SignatureRegistry {
    pub fn negotiated(&self, object_type: &str) -> Option<UseSignature> {
        self.negotiated.get(object_type).copied()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_empty(&self) -> bool {
        self.negotiated.is_empty()
    }

    /// Calls `UsedBy` on `object`. Uses the cached shape for the object's type
    /// when there is one; otherwise probes [`UseSignature::PROBE_ORDER`].
    pub fn invoke<H: AutoOpenHost>(
        &mut self,
        host: &mut H,
        object: H::Object,
        player: &PlayerContext<H::Actor>,
    ) -> Result<UseSignature, HostError> {
        let object_type = host.object_type(object);

        let mut rejected = None;
        if let Some(signature) = self.negotiated(&object_type) {
            if let Some(args) = signature.args(player) {
                match host.used_by(object, args) {
                    Err(HostError::SignatureMismatch) => rejected = Some(signature),
                    result => return result.map(|_| signature),
                }
            }
            // The cached shape no longer fits; negotiate again.
            self.negotiated.remove(&object_type);
        }

        let mut first_failure = None;
        for signature in UseSignature::PROBE_ORDER {
            if rejected == Some(signature) {
                continue;
            }
            let Some(args) = signature.args(player) else {
                continue;
            };
            match host.used_by(object, args) {
                Ok(()) => {
                    self.negotiated.insert(object_type, signature);
                    return Ok(signature);
                }
                Err(error @ (HostError::MissingEntryPoint | HostError::StaleHandle)) => {
                    return Err(error);
                }
                Err(HostError::SignatureMismatch) => {}
                Err(error) => {
                    first_failure.get_or_insert(error);
                }
            }
        }
        // The first host fault wins over any shape mismatch.
        Err(first_failure.unwrap_or(HostError::SignatureMismatch))
    }
}
