//! World module housing the level layout and player controls.
pub mod components;
pub mod plugin;
pub mod props;
pub mod systems;

pub use plugin::WorldPlugin;
