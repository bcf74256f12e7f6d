// src/ui/status_panel/components.rs
//
// Components and resources for the status panel.

use bevy::prelude::*;

/// Root node of the status panel.
#[derive(Component, Debug)]
pub struct StatusPanel;

/// The text node the panel rewrites when the loop state changes.
#[derive(Component, Debug)]
pub struct StatusPanelText;

/// Layout settings for the status panel.
#[derive(Resource, Debug)]
pub struct StatusPanelSettings {
    /// How many recent attempts to list.
    pub recent_attempts: usize,

    /// Panel width (pixels).
    pub panel_width: f32,

    /// Padding inside panel (pixels).
    pub padding: f32,

    /// Border width (pixels).
    pub border_width: f32,

    /// Offset from top-left corner of screen (pixels).
    pub corner_offset: f32,

    /// Font size for the panel text (points).
    pub text_font_size: f32,
}

impl Default for StatusPanelSettings {
    fn default() -> Self {
        Self {
            recent_attempts: 5,
            panel_width: 320.0,
            padding: 10.0,
            border_width: 2.0,
            corner_offset: 16.0,
            text_font_size: 15.0,
        }
    }
}
