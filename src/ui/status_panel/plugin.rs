// src/ui/status_panel/plugin.rs
//
// UiPlugin spawns the status panel and keeps it in sync.

use bevy::prelude::*;

use crate::auto_open::AutoOpenSystems;

use super::components::StatusPanelSettings;
use super::systems::{spawn_status_panel, update_status_panel};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");

        app.insert_resource(StatusPanelSettings::default())
            .add_systems(Startup, spawn_status_panel)
            .add_systems(Update, update_status_panel.after(AutoOpenSystems));
    }
}
