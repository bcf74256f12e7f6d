use std::path::Path;

use bevy::prelude::*;

mod auto_open;
mod core;
mod ui;
mod world;

use crate::{auto_open::AutoOpenPlugin, core::CorePlugin, ui::UiPlugin, world::WorldPlugin};

fn main() {
    load_local_env();

    App::new()
        .add_plugins((
            DefaultPlugins,
            CorePlugin::default(),
            WorldPlugin,
            AutoOpenPlugin,
            UiPlugin, // After AutoOpenPlugin so the panel reads this frame's attempts
        ))
        .run();
}

/// Loads `AUTO_OPEN_*` overrides from `autocontainer.env` when present.
fn load_local_env() {
    const ENV_FILE: &str = "autocontainer.env";

    let path = Path::new(ENV_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", ENV_FILE, err);
    }
}
