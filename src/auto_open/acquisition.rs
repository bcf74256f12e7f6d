//! Candidate acquisition: a throttled world scan or a fresh one per check.
use serde::{Deserialize, Serialize};

use super::{
    errors::HostError,
    host::{AutoOpenHost, INTERACTIVE_OBJECT_CLASS},
};

/// How long a cached scan is reused before the world is queried again.
pub const CACHE_TTL_SECONDS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionStrategy {
    /// Reuse a snapshot of the full scan for [`CACHE_TTL_SECONDS`].
    Cached,
    /// Query the world on every check.
    Fresh,
}

/// Objects handed to the eligibility filter for one check.
#[derive(Debug, Clone)]
pub struct Acquisition<O> {
    pub objects: Vec<O>,
    /// Whether the world was queried for this check.
    pub refreshed: bool,
}

/// Owns the cached snapshot (when caching) and produces candidate sets.
#[derive(Debug)]
pub struct CandidateSource<O> {
    strategy: AcquisitionStrategy,
    snapshot: Vec<O>,
    refreshed_at: Option<f64>,
}

impl<O: Copy> CandidateSource<O> {
    pub fn new(strategy: AcquisitionStrategy) -> Self {
        Self {
            strategy,
            snapshot: Vec::new(),
            refreshed_at: None,
        }
    }

    pub fn set_strategy(&mut self, strategy: AcquisitionStrategy) {
        if self.strategy != strategy {
            self.strategy = strategy;
            self.invalidate();
        }
    }

    /// Forces the next cached acquisition to query the world.
    pub fn invalidate(&mut self) {
        self.snapshot.clear();
        self.refreshed_at = None;
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn snapshot_len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn needs_refresh(&self, now: f64) -> bool {
        match self.refreshed_at {
            None => true,
            Some(refreshed_at) => now < refreshed_at || now - refreshed_at > CACHE_TTL_SECONDS,
        }
    }

    /// Returns the candidates for this check. Handles the host reports as
    /// invalid never make it into the result, cached or not.
    pub fn acquire<H>(&mut self, host: &H, now: f64) -> Result<Acquisition<O>, HostError>
    where
        H: AutoOpenHost<Object = O>,
    {
        match self.strategy {
            AcquisitionStrategy::Fresh => {
                let objects = host
                    .find_all(INTERACTIVE_OBJECT_CLASS)?
                    .into_iter()
                    .filter(|object| host.is_valid(*object))
                    .collect();
                Ok(Acquisition {
                    objects,
                    refreshed: true,
                })
            }
            AcquisitionStrategy::Cached => {
                let refreshed = self.needs_refresh(now);
                if refreshed {
                    // A failed query leaves the previous snapshot in place.
                    let scanned = host.find_all(INTERACTIVE_OBJECT_CLASS)?;
                    self.snapshot = scanned
                        .into_iter()
                        .filter(|object| host.is_valid(*object) && host.location(*object).is_some())
                        .collect();
                    self.refreshed_at = Some(now);
                }

                let objects = self
                    .snapshot
                    .iter()
                    .copied()
                    .filter(|object| host.is_valid(*object))
                    .collect();
                Ok(Acquisition { objects, refreshed })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec3;

    use super::*;
    use crate::auto_open::host::fake::{FakeHost, FakeObject};

    fn host_with_three() -> FakeHost {
        let mut host = FakeHost::with_player_at(Vec3::ZERO);
        host.spawn(FakeObject::container("a", Vec3::X * 10.0));
        host.spawn(FakeObject::container("b", Vec3::X * 20.0));
        host.spawn(FakeObject {
            location: None,
            ..FakeObject::container("unplaced", Vec3::ZERO)
        });
        host
    }

    #[test]
    fn cached_scan_is_reused_within_ttl() {
        let host = host_with_three();
        let mut source = CandidateSource::new(AcquisitionStrategy::Cached);

        let first = source.acquire(&host, 0.0).expect("query succeeds");
        assert!(first.refreshed);
        assert_eq!(first.objects, vec![0, 1]);

        let second = source.acquire(&host, 4.9).expect("cached");
        assert!(!second.refreshed);
        assert_eq!(host.queries.get(), 1);

        let third = source.acquire(&host, 5.1).expect("refreshed");
        assert!(third.refreshed);
        assert_eq!(host.queries.get(), 2);
    }

    #[test]
    fn cached_scan_drops_objects_destroyed_since_the_snapshot() {
        let mut host = host_with_three();
        let mut source = CandidateSource::new(AcquisitionStrategy::Cached);
        source.acquire(&host, 0.0).expect("query succeeds");

        host.objects[0].alive = false;
        let acquisition = source.acquire(&host, 1.0).expect("cached");
        assert_eq!(acquisition.objects, vec![1]);
    }

    #[test]
    fn fresh_scan_queries_every_time() {
        let host = host_with_three();
        let mut source = CandidateSource::new(AcquisitionStrategy::Fresh);
        for step in 0..3 {
            let acquisition = source.acquire(&host, step as f64 * 0.5).expect("query");
            assert!(acquisition.refreshed);
            assert_eq!(acquisition.objects.len(), 3);
        }
        assert_eq!(host.queries.get(), 3);
    }

    #[test]
    fn failed_rebuild_keeps_previous_snapshot() {
        let mut host = host_with_three();
        let mut source = CandidateSource::new(AcquisitionStrategy::Cached);
        source.acquire(&host, 0.0).expect("query succeeds");

        host.query_error = Some(HostError::query_failed("streaming level"));
        assert!(source.acquire(&host, 10.0).is_err());
        assert_eq!(source.snapshot_len(), 2);
    }

    #[test]
    fn switching_strategy_invalidates_the_cache() {
        let host = host_with_three();
        let mut source = CandidateSource::new(AcquisitionStrategy::Cached);
        source.acquire(&host, 0.0).expect("query succeeds");
        source.set_strategy(AcquisitionStrategy::Fresh);
        source.set_strategy(AcquisitionStrategy::Cached);
        assert!(source.needs_refresh(0.1));
    }
}
