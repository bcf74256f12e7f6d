//! Per-candidate eligibility checks, applied in a fixed order.
use std::fmt;

use bevy::math::Vec3;

use super::{
    cooldown::{CooldownKey, CooldownTable, KeyPolicy, COOLDOWN_SECONDS},
    errors::HostError,
    host::AutoOpenHost,
};

/// Substrings of a definition descriptor that mark an area transition.
pub const MAP_TRANSIT_MARKERS: [&str; 2] = ["MapChangeObjects", "MapChanger"];

/// Straight Euclidean distance between two points.
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Plain substring test on the descriptor; a missing descriptor is never a transit.
pub fn is_map_transit_definition(definition: Option<&str>) -> bool {
    definition.is_some_and(|definition| {
        MAP_TRANSIT_MARKERS
            .iter()
            .any(|marker| definition.contains(marker))
    })
}

pub fn is_map_transit<H: AutoOpenHost>(host: &H, object: H::Object) -> Result<bool, HostError> {
    let definition = host.definition(object)?;
    Ok(is_map_transit_definition(definition.as_deref()))
}

/// Why a candidate was left out of this check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ineligible {
    NoPosition,
    MapTransit,
    OutOfRange { distance: f32 },
    CoolingDown { remaining_seconds: f64 },
}

impl fmt::Display for Ineligible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPosition => write!(f, "no position"),
            Self::MapTransit => write!(f, "map transit"),
            Self::OutOfRange { distance } => write!(f, "out of range ({:.0})", distance),
            Self::CoolingDown { remaining_seconds } => {
                write!(f, "cooling down ({:.1}s left)", remaining_seconds)
            }
        }
    }
}

/// A candidate that passed every check.
#[derive(Debug, Clone)]
pub struct Eligible<O> {
    pub object: O,
    pub key: CooldownKey,
    pub distance: f32,
}

#[derive(Debug, Clone)]
pub enum Verdict<O> {
    Eligible(Eligible<O>),
    Ineligible(Ineligible),
    /// The transit check itself failed; the candidate is skipped.
    Unclassifiable(HostError),
}

/// Everything the filter needs that does not change between candidates.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub player_location: Vec3,
    pub radius: f32,
    pub now: f64,
    pub keys: KeyPolicy,
    pub cooldowns: &'a CooldownTable,
}

/// Position, then transit, then range, then cooldown. Stops at the first failure.
pub fn evaluate<H: AutoOpenHost>(
    host: &H,
    object: H::Object,
    context: &FilterContext<'_>,
) -> Verdict<H::Object> {
    let Some(location) = host.location(object) else {
        return Verdict::Ineligible(Ineligible::NoPosition);
    };

    match is_map_transit(host, object) {
        Ok(true) => return Verdict::Ineligible(Ineligible::MapTransit),
        Ok(false) => {}
        Err(error) => return Verdict::Unclassifiable(error),
    }

    let distance = distance(location, context.player_location);
    if distance > context.radius {
        return Verdict::Ineligible(Ineligible::OutOfRange { distance });
    }

    let key = context.keys.key_for(host, object, location);
    if context.cooldowns.is_cooling(&key, context.now) {
        let last = context.cooldowns.last_attempt(&key).unwrap_or(context.now);
        return Verdict::Ineligible(Ineligible::CoolingDown {
            remaining_seconds: COOLDOWN_SECONDS - (context.now - last),
        });
    }

    Verdict::Eligible(Eligible {
        object,
        key,
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auto_open::{
        host::fake::{FakeHost, FakeObject},
        host::ObjectKey,
    };

    fn context(cooldowns: &CooldownTable, now: f64) -> FilterContext<'_> {
        FilterContext {
            player_location: Vec3::ZERO,
            radius: 300.0,
            now,
            keys: KeyPolicy::default(),
            cooldowns,
        }
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = Vec3::new(3.0, -4.0, 12.0);
        let b = Vec3::new(-7.5, 2.0, 0.25);
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0.0);
        assert_eq!(distance(Vec3::ZERO, Vec3::new(3.0, 4.0, 12.0)), 13.0);
    }

    #[test]
    fn transit_markers_are_plain_substrings() {
        assert!(is_map_transit_definition(Some(
            "InteractiveObjectDefinition'GD_MapChangeObjects.Door'"
        )));
        assert!(is_map_transit_definition(Some("Lift_MapChanger_02")));
        assert!(!is_map_transit_definition(Some("Lootables.RedChest")));
        assert!(!is_map_transit_definition(Some("mapchanger")));
        assert!(!is_map_transit_definition(None));
    }

    #[test]
    fn out_of_range_is_never_eligible() {
        let mut host = FakeHost::with_player_at(Vec3::ZERO);
        let far = host.spawn(FakeObject::container("far", Vec3::new(300.5, 0.0, 0.0)));
        let edge = host.spawn(FakeObject::container("edge", Vec3::new(0.0, 300.0, 0.0)));
        let table = CooldownTable::default();

        assert!(matches!(
            evaluate(&host, far, &context(&table, 0.0)),
            Verdict::Ineligible(Ineligible::OutOfRange { .. })
        ));
        assert!(matches!(
            evaluate(&host, edge, &context(&table, 0.0)),
            Verdict::Eligible(_)
        ));
    }

    #[test]
    fn transit_is_rejected_before_range_and_cooldown() {
        let mut host = FakeHost::with_player_at(Vec3::ZERO);
        let door = host.spawn(FakeObject::transit("door", Vec3::new(50.0, 0.0, 0.0)));
        let table = CooldownTable::default();

        assert!(matches!(
            evaluate(&host, door, &context(&table, 0.0)),
            Verdict::Ineligible(Ineligible::MapTransit)
        ));
    }

    #[test]
    fn missing_position_short_circuits() {
        let mut host = FakeHost::with_player_at(Vec3::ZERO);
        let ghost = host.spawn(FakeObject {
            location: None,
            definition: Err(HostError::definition_unreadable("unreachable")),
            ..FakeObject::container("ghost", Vec3::ZERO)
        });
        let table = CooldownTable::default();

        assert!(matches!(
            evaluate(&host, ghost, &context(&table, 0.0)),
            Verdict::Ineligible(Ineligible::NoPosition)
        ));
    }

    #[test]
    fn unreadable_definition_is_reported_not_guessed() {
        let mut host = FakeHost::with_player_at(Vec3::ZERO);
        let broken = host.spawn(FakeObject {
            definition: Err(HostError::definition_unreadable("bad cast")),
            ..FakeObject::container("broken", Vec3::X)
        });
        let table = CooldownTable::default();

        assert!(matches!(
            evaluate(&host, broken, &context(&table, 0.0)),
            Verdict::Unclassifiable(HostError::DefinitionUnreadable(_))
        ));
    }

    #[test]
    fn cooling_candidates_report_time_left() {
        let mut host = FakeHost::with_player_at(Vec3::ZERO);
        let chest = host.spawn(FakeObject::container("chest", Vec3::X * 100.0));
        let mut table = CooldownTable::default();
        table.record(CooldownKey::Handle(ObjectKey::new(chest as u64)), 0.0);

        match evaluate(&host, chest, &context(&table, 29.0)) {
            Verdict::Ineligible(Ineligible::CoolingDown { remaining_seconds }) => {
                assert!((remaining_seconds - 1.0).abs() < 1e-9);
            }
            other => panic!("expected cooldown, got {other:?}"),
        }
        assert!(matches!(
            evaluate(&host, chest, &context(&table, 30.0)),
            Verdict::Eligible(_)
        ));
    }
}
