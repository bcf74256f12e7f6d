//! Systems driving the auto-open loop inside the Bevy schedule.
use bevy::log::{debug, error, info, warn};
use bevy::prelude::*;

use crate::core::plugin::SimulationClock;

use super::{
    config::AutoOpenSettings,
    ecs_host::{EcsAutoOpenState, EcsHost},
    errors::HostError,
    journal::AutoOpenJournal,
    state::{SkipReason, TickReport},
    telemetry::{AttemptTelemetry, AttemptTelemetryLog},
};

const TOGGLE_KEY: KeyCode = KeyCode::F8;
const RANGE_DOWN_KEY: KeyCode = KeyCode::BracketLeft;
const RANGE_UP_KEY: KeyCode = KeyCode::BracketRight;

/// Runs once per frame after the player has moved.
pub fn auto_open_containers(
    mut state: ResMut<EcsAutoOpenState>,
    settings: Res<AutoOpenSettings>,
    clock: Res<SimulationClock>,
    mut host: EcsHost,
    mut journal: ResMut<AutoOpenJournal>,
    mut telemetry: ResMut<AttemptTelemetry>,
    mut telemetry_log: ResMut<AttemptTelemetryLog>,
) {
    let now = clock.now_seconds();

    let summary = match state.tick(&mut host, &settings, now) {
        TickReport::Checked(summary) => summary,
        TickReport::Skipped(SkipReason::QueryFailed(err)) => {
            error!(target: "auto_open", "Interactive object scan failed: {}", err);
            journal.push(format!("[AutoContainer] Scan failed: {}", err));
            return;
        }
        TickReport::Skipped(_) => return,
    };

    if summary.refreshed {
        debug!(
            target: "auto_open",
            "Scanned {} interactive objects ({} eligible, {} cooldowns pruned)",
            summary.candidates,
            summary.eligible,
            summary.pruned
        );
    }

    for skipped in &summary.unclassified {
        warn!(
            target: "auto_open",
            "Skipping {} ({}): transit check failed: {}",
            skipped.name,
            skipped.object,
            skipped.error
        );
    }

    for attempt in summary.attempts {
        match &attempt.result {
            Ok(signature) => {
                info!(
                    target: "auto_open",
                    "Opened {} at {:.0} units via {}",
                    attempt.name,
                    attempt.distance,
                    signature
                );
                journal.push(format!("[AutoContainer] Opened {}", attempt.name));
            }
            Err(HostError::MissingEntryPoint) => {
                debug!(
                    target: "auto_open",
                    "{} has nothing to open; cooling down anyway",
                    attempt.name
                );
            }
            Err(err) => {
                warn!(
                    target: "auto_open",
                    "Failed to open {}: {}",
                    attempt.name,
                    err
                );
                journal.push(format!(
                    "[AutoContainer] Failed to open {}: {}",
                    attempt.name, err
                ));
            }
        }
        telemetry_log.push(&attempt);
        telemetry.push(attempt);
    }
}

/// F8 toggles the loop, `[` and `]` step the range. Changes are saved right away.
pub fn handle_auto_open_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut settings: ResMut<AutoOpenSettings>,
) {
    let mut changed = false;

    if keyboard.just_pressed(TOGGLE_KEY) {
        let enabled = settings.toggle_enabled();
        info!(
            target: "auto_open",
            "Auto open {}",
            if enabled { "enabled" } else { "disabled" }
        );
        changed = true;
    }

    let steps = i32::from(keyboard.just_pressed(RANGE_UP_KEY))
        - i32::from(keyboard.just_pressed(RANGE_DOWN_KEY));
    if steps != 0 {
        let range = settings.step_open_range(steps);
        info!(target: "auto_open", "Open range set to {:.0}", range);
        changed = true;
    }

    if changed {
        if let Err(err) = settings.save() {
            warn!(
                "Failed to save auto-open settings to {:?}: {}",
                settings.path(),
                err
            );
        }
    }
}

pub fn log_auto_open_settings(settings: Res<AutoOpenSettings>) {
    let behaviour = settings.behaviour;
    info!(
        target: "auto_open",
        "AutoOpenPlugin initialised: profile {} ({}), range {:.0}, every {} ticks, {:?} scan, {:?} selection, {:?} pruning",
        settings.profile,
        if settings.enabled { "enabled" } else { "disabled" },
        settings.open_range(),
        behaviour.check_interval_ticks,
        behaviour.acquisition,
        behaviour.selection,
        behaviour.pruning
    );
}
