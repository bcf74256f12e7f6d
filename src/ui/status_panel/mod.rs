// src/ui/status_panel/mod.rs
//
// Status panel showing what the auto-open loop is doing.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::UiPlugin;
