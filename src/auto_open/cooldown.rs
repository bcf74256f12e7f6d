//! Per-object cooldown bookkeeping.
use std::collections::{HashMap, HashSet};

use bevy::math::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use super::host::{AutoOpenHost, ObjectKey};

/// Minimum time between two attempts on the same object.
pub const COOLDOWN_SECONDS: f64 = 30.0;

/// How stale entries leave the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownPruning {
    /// Entries live for the whole process. The table grows without bound.
    Never,
    /// Entries whose object is missing from the current scan are dropped.
    Absent,
    /// Entries older than the cooldown window are dropped.
    Expired,
}

/// What identifies "the same object" across checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownKeyStrategy {
    Handle,
    /// Object type plus a rounded position, for hosts that recycle handles.
    Signature,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CooldownKey {
    Handle(ObjectKey),
    Signature { object_type: String, cell: IVec3 },
}

impl CooldownKey {
    pub fn signature(object_type: impl Into<String>, location: Vec3, cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
        Self::Signature {
            object_type: object_type.into(),
            cell: (location / cell_size).round().as_ivec3(),
        }
    }
}

/// Turns a world object into its cooldown key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPolicy {
    pub strategy: CooldownKeyStrategy,
    /// Grid size used to round positions into signatures.
    pub cell_size: f32,
}

impl KeyPolicy {
    pub fn key_for<H: AutoOpenHost>(
        &self,
        host: &H,
        object: H::Object,
        location: Vec3,
    ) -> CooldownKey {
        match self.strategy {
            CooldownKeyStrategy::Handle => CooldownKey::Handle(host.identity(object)),
            CooldownKeyStrategy::Signature => {
                CooldownKey::signature(host.object_type(object), location, self.cell_size)
            }
        }
    }

    /// Key of an object that may not have a position; signatures need one.
    pub fn key_of<H: AutoOpenHost>(&self, host: &H, object: H::Object) -> Option<CooldownKey> {
        match self.strategy {
            CooldownKeyStrategy::Handle => Some(CooldownKey::Handle(host.identity(object))),
            CooldownKeyStrategy::Signature => host
                .location(object)
                .map(|location| self.key_for(host, object, location)),
        }
    }
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            strategy: CooldownKeyStrategy::Handle,
            cell_size: 50.0,
        }
    }
}

/// Last attempt time per key, in seconds of simulation time.
#[derive(Debug, Default)]
pub struct CooldownTable {
    entries: HashMap<CooldownKey, f64>,
}

impl CooldownTable {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_attempt(&self, key: &CooldownKey) -> Option<f64> {
        self.entries.get(key).copied()
    }

    /// True while fewer than [`COOLDOWN_SECONDS`] have passed since the last attempt.
    pub fn is_cooling(&self, key: &CooldownKey, now: f64) -> bool {
        self.entries
            .get(key)
            .is_some_and(|last| now - last < COOLDOWN_SECONDS)
    }

    pub fn record(&mut self, key: CooldownKey, now: f64) {
        self.entries.insert(key, now);
    }

    /// Applies `pruning` and returns how many entries were evicted.
    pub fn prune(
        &mut self,
        pruning: CooldownPruning,
        present: &HashSet<CooldownKey>,
        now: f64,
    ) -> usize {
        let before = self.entries.len();
        match pruning {
            CooldownPruning::Never => {}
            CooldownPruning::Absent => self.entries.retain(|key, _| present.contains(key)),
            CooldownPruning::Expired => self
                .entries
                .retain(|_, last| now - *last < COOLDOWN_SECONDS),
        }
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: u64) -> CooldownKey {
        CooldownKey::Handle(ObjectKey::new(value))
    }

    #[test]
    fn cooldown_expires_at_exactly_the_window() {
        let mut table = CooldownTable::default();
        table.record(key(1), 100.0);

        assert!(table.is_cooling(&key(1), 100.0));
        assert!(table.is_cooling(&key(1), 129.0));
        assert!(!table.is_cooling(&key(1), 130.0));
        assert!(!table.is_cooling(&key(1), 131.0));
        assert!(!table.is_cooling(&key(2), 100.0));
    }

    #[test]
    fn recording_overwrites_the_previous_attempt() {
        let mut table = CooldownTable::default();
        table.record(key(1), 0.0);
        table.record(key(1), 40.0);
        assert_eq!(table.last_attempt(&key(1)), Some(40.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn never_pruning_keeps_everything() {
        let mut table = CooldownTable::default();
        for value in 0..10 {
            table.record(key(value), 0.0);
        }
        let evicted = table.prune(CooldownPruning::Never, &HashSet::new(), 1_000.0);
        assert_eq!(evicted, 0);
        assert_eq!(table.len(), 10);
    }

    #[test]
    fn absent_pruning_drops_objects_missing_from_the_scan() {
        let mut table = CooldownTable::default();
        table.record(key(1), 0.0);
        table.record(key(2), 0.0);
        let present: HashSet<_> = [key(2)].into_iter().collect();

        assert_eq!(table.prune(CooldownPruning::Absent, &present, 1.0), 1);
        assert!(table.last_attempt(&key(1)).is_none());
        assert!(table.is_cooling(&key(2), 1.0));
    }

    #[test]
    fn expired_pruning_drops_old_entries_only() {
        let mut table = CooldownTable::default();
        table.record(key(1), 0.0);
        table.record(key(2), 20.0);

        assert_eq!(table.prune(CooldownPruning::Expired, &HashSet::new(), 35.0), 1);
        assert_eq!(table.len(), 1);
        assert!(table.is_cooling(&key(2), 35.0));
    }

    #[test]
    fn signatures_collapse_nearby_positions_of_the_same_type() {
        let a = CooldownKey::signature("Lootable", Vec3::new(101.0, 0.0, 49.0), 50.0);
        let b = CooldownKey::signature("Lootable", Vec3::new(99.0, 4.0, 51.0), 50.0);
        let c = CooldownKey::signature("Transit", Vec3::new(99.0, 4.0, 51.0), 50.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
