// src/ui/status_panel/systems.rs
//
// Systems for spawning and refreshing the status panel.

use bevy::prelude::*;

use crate::auto_open::{config::AutoOpenSettings, telemetry::AttemptTelemetry};

use super::components::{StatusPanel, StatusPanelSettings, StatusPanelText};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.8);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.3);
const TEXT_COLOR: Color = Color::WHITE;

/// Spawn the panel once at startup. The text is filled in by `update_status_panel`.
pub fn spawn_status_panel(mut commands: Commands, settings: Res<StatusPanelSettings>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(settings.corner_offset),
                left: Val::Px(settings.corner_offset),
                width: Val::Px(settings.panel_width),
                padding: UiRect::all(Val::Px(settings.padding)),
                border: UiRect::all(Val::Px(settings.border_width)),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            BorderColor::from(BORDER_COLOR),
            StatusPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.text_font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                StatusPanelText,
            ));
        });
}

/// Rewrite the panel text when the settings or the attempt history change.
pub fn update_status_panel(
    auto_open: Res<AutoOpenSettings>,
    telemetry: Res<AttemptTelemetry>,
    settings: Res<StatusPanelSettings>,
    mut text_query: Query<&mut Text, With<StatusPanelText>>,
) {
    if !auto_open.is_changed() && !telemetry.is_changed() {
        return;
    }

    let content = status_lines(&auto_open, &telemetry, settings.recent_attempts).join("\n");
    for mut text in text_query.iter_mut() {
        text.0.clone_from(&content);
    }
}

pub fn status_lines(
    settings: &AutoOpenSettings,
    telemetry: &AttemptTelemetry,
    recent: usize,
) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Auto open: {} [F8]",
            if settings.enabled { "ON" } else { "OFF" }
        ),
        format!("Range: {:.0} [ / ]", settings.open_range()),
        format!("Profile: {}", settings.profile),
        format!(
            "Opened {} | Failed {}",
            telemetry.opened_total(),
            telemetry.failed_total()
        ),
    ];

    for attempt in telemetry.recent().take(recent) {
        lines.push(match &attempt.result {
            Ok(_) => format!("+ {} ({:.0})", attempt.name, attempt.distance),
            Err(err) => format!("x {}: {}", attempt.name, err),
        });
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auto_open::{
        errors::HostError, host::ObjectKey, invoke::UseSignature, state::Attempt,
    };

    fn attempt(name: &str, result: Result<UseSignature, HostError>) -> Attempt {
        Attempt {
            object: ObjectKey::new(7),
            name: name.to_string(),
            distance: 140.0,
            at: 1.0,
            result,
        }
    }

    #[test]
    fn lines_show_settings_and_newest_attempts_first() {
        let settings = AutoOpenSettings::default();
        let mut telemetry = AttemptTelemetry::default();
        telemetry.push(attempt("Red Chest", Ok(UseSignature::Pawn)));
        telemetry.push(attempt("Rusty Locker", Err(HostError::fault("jammed"))));
        telemetry.push(attempt("Ammo Crate", Ok(UseSignature::Pawn)));

        let lines = status_lines(&settings, &telemetry, 2);
        assert_eq!(lines[0], "Auto open: ON [F8]");
        assert_eq!(lines[1], "Range: 300 [ / ]");
        assert_eq!(lines[2], "Profile: cached_nearest");
        assert_eq!(lines[3], "Opened 2 | Failed 1");
        assert_eq!(lines[4], "+ Ammo Crate (140)");
        assert_eq!(lines[5], "x Rusty Locker: host fault: jammed");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn panel_text_follows_the_toggle() {
        let mut app = App::new();
        app.insert_resource(AutoOpenSettings::default())
            .init_resource::<AttemptTelemetry>()
            .insert_resource(StatusPanelSettings::default())
            .add_systems(Startup, spawn_status_panel)
            .add_systems(Update, update_status_panel);
        app.update();

        app.world_mut().resource_mut::<AutoOpenSettings>().enabled = false;
        app.update();

        let world = app.world_mut();
        let text = world
            .query_filtered::<&Text, With<StatusPanelText>>()
            .single(world)
            .expect("panel text");
        assert!(text.0.starts_with("Auto open: OFF"));
    }
}
