// src/ui/mod.rs
//
// UI module providing screen-space HUD elements.
//
// Current features:
// - Auto-open status panel (top-left: toggle state, range, recent attempts)

pub mod status_panel;

// Re-export the main plugin
pub use status_panel::UiPlugin;
