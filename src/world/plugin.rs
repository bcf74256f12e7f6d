//! WorldPlugin lays out the level and moves the player around it.
use bevy::prelude::*;

use crate::auto_open::AutoOpenSystems;
use crate::world::systems::{
    move_player, player_mouse_look, spawn_interactive_props, spawn_world_environment,
    squash_opened_props, update_cursor_grab,
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_world_environment, spawn_interactive_props))
            .add_systems(
                Update,
                (
                    update_cursor_grab,
                    player_mouse_look.after(update_cursor_grab),
                    move_player,
                )
                    .before(AutoOpenSystems),
            )
            .add_systems(Update, squash_opened_props.after(AutoOpenSystems));
    }
}
