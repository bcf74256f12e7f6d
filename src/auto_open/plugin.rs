//! AutoOpenPlugin wires the proximity auto-open loop into the app.
use bevy::prelude::*;

use super::{
    components::ContainerOpened,
    config::AutoOpenSettings,
    ecs_host::EcsAutoOpenState,
    journal::{flush_auto_open_journal, AutoOpenJournal},
    systems::{auto_open_containers, handle_auto_open_hotkeys, log_auto_open_settings},
    telemetry::{flush_attempt_telemetry_log, AttemptTelemetry, AttemptTelemetryLog},
};

/// Systems that read the player's position. Movement should run before this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AutoOpenSystems;

pub struct AutoOpenPlugin;

impl Plugin for AutoOpenPlugin {
    fn build(&self, app: &mut App) {
        let settings = AutoOpenSettings::load_or_default();
        let state = EcsAutoOpenState::new(&settings.behaviour);

        app.insert_resource(settings)
            .insert_resource(state)
            .insert_resource(AutoOpenJournal::default())
            .insert_resource(AttemptTelemetry::default())
            .insert_resource(AttemptTelemetryLog::default())
            .add_message::<ContainerOpened>()
            .add_systems(Startup, log_auto_open_settings)
            .add_systems(
                Update,
                (
                    handle_auto_open_hotkeys,
                    auto_open_containers.after(handle_auto_open_hotkeys),
                    flush_auto_open_journal.after(auto_open_containers),
                    flush_attempt_telemetry_log.after(auto_open_containers),
                )
                    .in_set(AutoOpenSystems),
            );
    }
}
