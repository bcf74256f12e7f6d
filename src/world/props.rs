//! Layout of the interactive props placed around the spawn point.
use bevy::prelude::*;

use crate::auto_open::components::{Interactive, UseHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Chest,
    AmmoCrate,
    JammedLocker,
    EmptyCrate,
    Elevator,
    FastTravel,
}

impl PropKind {
    pub fn interactive(self) -> Interactive {
        match self {
            PropKind::Chest => Interactive::container("GD_Lootables.Chest_Red"),
            PropKind::AmmoCrate => Interactive::container("GD_Lootables.AmmoCrate"),
            PropKind::JammedLocker => {
                Interactive::container("GD_Lootables.Locker").with_handler(UseHandler::Jammed)
            }
            PropKind::EmptyCrate => {
                Interactive::container("GD_Lootables.Crate_Empty").with_handler(UseHandler::Inert)
            }
            PropKind::Elevator => Interactive::map_transit("Elevator_Up"),
            PropKind::FastTravel => Interactive::new(
                "Transit",
                Some("InteractiveObjectDefinition'GD_Stations.MapChanger_FastTravel'".to_string()),
                UseHandler::PawnAndController,
            ),
        }
    }

    pub fn color(self) -> Color {
        match self {
            PropKind::Chest => Color::srgb_u8(180, 40, 40),
            PropKind::AmmoCrate => Color::srgb_u8(110, 120, 60),
            PropKind::JammedLocker => Color::srgb_u8(90, 90, 110),
            PropKind::EmptyCrate => Color::srgb_u8(120, 90, 60),
            PropKind::Elevator | PropKind::FastTravel => Color::srgb_u8(60, 120, 200),
        }
    }

    pub fn size(self) -> Vec3 {
        match self {
            PropKind::Chest | PropKind::AmmoCrate | PropKind::EmptyCrate => {
                Vec3::new(90.0, 60.0, 60.0)
            }
            PropKind::JammedLocker => Vec3::new(60.0, 180.0, 50.0),
            PropKind::Elevator | PropKind::FastTravel => Vec3::new(200.0, 300.0, 20.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropSpec {
    pub name: &'static str,
    pub kind: PropKind,
    pub position: Vec3,
}

impl PropSpec {
    const fn new(name: &'static str, kind: PropKind, x: f32, z: f32) -> Self {
        Self {
            name,
            kind,
            position: Vec3::new(x, 0.0, z),
        }
    }
}

/// Props sit on the ground plane. Positions are in world units, 1 unit = 1 cm.
pub fn prop_layout() -> Vec<PropSpec> {
    vec![
        PropSpec::new("Red Chest", PropKind::Chest, 250.0, -150.0),
        PropSpec::new("Ammo Crate", PropKind::AmmoCrate, -220.0, -260.0),
        PropSpec::new("Rusty Locker", PropKind::JammedLocker, 420.0, 380.0),
        PropSpec::new("Empty Crate", PropKind::EmptyCrate, -600.0, 300.0),
        PropSpec::new("Supply Chest", PropKind::Chest, 1200.0, -900.0),
        PropSpec::new("Ammo Cache", PropKind::AmmoCrate, -1500.0, 1100.0),
        PropSpec::new("Elevator", PropKind::Elevator, 0.0, 180.0),
        PropSpec::new("Fast Travel Station", PropKind::FastTravel, -900.0, -900.0),
    ]
}
