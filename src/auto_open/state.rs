//! The auto-open loop: gate, acquire, filter, select, invoke, record.
use std::collections::HashSet;

use bevy::prelude::*;

use super::{
    acquisition::CandidateSource,
    config::{AutoOpenSettings, LoopBehaviour},
    cooldown::{CooldownKey, CooldownPruning, CooldownTable},
    eligibility::{evaluate, FilterContext, Verdict},
    errors::HostError,
    gate::TickGate,
    host::{AutoOpenHost, ObjectKey},
    invoke::{SignatureRegistry, UseSignature},
    selection::select,
};

/// Why a tick ended before any candidate was looked at.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Disabled,
    Gated,
    NoPlayer,
    NoPlayerLocation,
    QueryFailed(HostError),
}

/// One `UsedBy` attempt and how it went.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub object: ObjectKey,
    pub name: String,
    pub distance: f32,
    pub at: f64,
    pub result: Result<UseSignature, HostError>,
}

impl Attempt {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// A candidate skipped because its transit check failed.
#[derive(Debug, Clone)]
pub struct Unclassified {
    pub object: ObjectKey,
    pub name: String,
    pub error: HostError,
}

#[derive(Debug, Clone, Default)]
pub struct CheckSummary {
    pub candidates: usize,
    pub eligible: usize,
    /// Whether this check queried the world instead of reusing the cache.
    pub refreshed: bool,
    pub pruned: usize,
    pub attempts: Vec<Attempt>,
    pub unclassified: Vec<Unclassified>,
}

#[derive(Debug, Clone)]
pub enum TickReport {
    Skipped(SkipReason),
    Checked(CheckSummary),
}

/// Everything the loop remembers between ticks.
#[derive(Resource, Debug)]
pub struct AutoOpenState<O> {
    gate: TickGate,
    source: CandidateSource<O>,
    cooldowns: CooldownTable,
    signatures: SignatureRegistry,
}

impl<O: Copy> AutoOpenState<O> {
    pub fn new(behaviour: &LoopBehaviour) -> Self {
        Self {
            gate: TickGate::new(behaviour.check_interval_ticks),
            source: CandidateSource::new(behaviour.acquisition),
            cooldowns: CooldownTable::default(),
            signatures: SignatureRegistry::default(),
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn cooldowns(&self) -> &CooldownTable {
        &self.cooldowns
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn gate(&self) -> &TickGate {
        &self.gate
    }

    /// Runs one host tick. Never fails: every host error ends up in the report.
    pub fn tick<H>(&mut self, host: &mut H, settings: &AutoOpenSettings, now: f64) -> TickReport
    where
        H: AutoOpenHost<Object = O>,
    {
        if !settings.enabled {
            return TickReport::Skipped(SkipReason::Disabled);
        }

        let behaviour = settings.behaviour;
        self.gate.set_interval(behaviour.check_interval_ticks);
        self.source.set_strategy(behaviour.acquisition);

        if !self.gate.advance() {
            return TickReport::Skipped(SkipReason::Gated);
        }

        let Some(player) = host.player() else {
            return TickReport::Skipped(SkipReason::NoPlayer);
        };
        let Some(player_location) = player.location else {
            return TickReport::Skipped(SkipReason::NoPlayerLocation);
        };

        let acquisition = match self.source.acquire(&*host, now) {
            Ok(acquisition) => acquisition,
            Err(error) => return TickReport::Skipped(SkipReason::QueryFailed(error)),
        };

        let mut summary = CheckSummary {
            candidates: acquisition.objects.len(),
            refreshed: acquisition.refreshed,
            ..Default::default()
        };

        if behaviour.pruning != CooldownPruning::Never {
            let present: HashSet<CooldownKey> = acquisition
                .objects
                .iter()
                .filter_map(|object| behaviour.keys.key_of(&*host, *object))
                .collect();
            summary.pruned = self.cooldowns.prune(behaviour.pruning, &present, now);
        }

        let mut eligible = Vec::new();
        {
            let context = FilterContext {
                player_location,
                radius: settings.open_range(),
                now,
                keys: behaviour.keys,
                cooldowns: &self.cooldowns,
            };
            for object in acquisition.objects.iter().copied() {
                match evaluate(&*host, object, &context) {
                    Verdict::Eligible(candidate) => eligible.push(candidate),
                    Verdict::Ineligible(_) => {}
                    Verdict::Unclassifiable(error) => summary.unclassified.push(Unclassified {
                        object: host.identity(object),
                        name: display_name(&*host, object),
                        error,
                    }),
                }
            }
        }
        summary.eligible = eligible.len();

        for candidate in select(behaviour.selection, eligible) {
            let result = self.signatures.invoke(host, candidate.object, &player);
            // Recorded whether or not the host call went through.
            self.cooldowns.record(candidate.key, now);
            summary.attempts.push(Attempt {
                object: host.identity(candidate.object),
                name: display_name(&*host, candidate.object),
                distance: candidate.distance,
                at: now,
                result,
            });
        }

        TickReport::Checked(summary)
    }
}

fn display_name<H: AutoOpenHost>(host: &H, object: H::Object) -> String {
    host.display_name(object)
        .unwrap_or_else(|| "Unknown".to_string())
}
