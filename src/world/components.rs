//! Components used by the world module.
use bevy::prelude::*;

/// Marks the pawn the local player moves around.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Player;

/// First-person look and movement state for the player pawn.
#[derive(Component)]
pub struct FlyCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub move_speed: f32,
    pub look_sensitivity: f32,
}

impl FlyCamera {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch,
            move_speed: 400.0,
            look_sensitivity: 0.2,
        }
    }
}

/// The main directional light.
#[derive(Component, Default)]
pub struct PrimarySun;
