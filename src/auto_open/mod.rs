//! Proximity auto-open: periodically uses the nearby containers around the player.
pub mod acquisition;
pub mod components;
pub mod config;
pub mod cooldown;
pub mod ecs_host;
pub mod eligibility;
pub mod errors;
pub mod gate;
pub mod host;
pub mod invoke;
pub mod journal;
pub mod plugin;
pub mod selection;
pub mod state;
pub mod systems;
pub mod telemetry;

pub use plugin::{AutoOpenPlugin, AutoOpenSystems};
