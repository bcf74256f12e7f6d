//! Systems for the world module.
use bevy::{
    ecs::message::MessageReader,
    input::{mouse::MouseMotion, ButtonInput},
    math::primitives::{Cuboid, Plane3d},
    prelude::*,
    window::{CursorGrabMode, CursorOptions},
};

use crate::auto_open::components::{ContainerOpened, Interactive, PlayerController};
use crate::world::components::{FlyCamera, Player, PrimarySun};
use crate::world::props::prop_layout;

const GROUND_SCALE: f32 = 4000.0;
const PLAYER_START_POS: Vec3 = Vec3::new(0.0, 170.0, -600.0);
const OPENED_PROP_HEIGHT_SCALE: f32 = 0.6;

/// Spawns the ground, the sun, the player pawn and its controller.
pub fn spawn_world_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(110, 100, 80),
            perceptual_roughness: 0.95,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(GROUND_SCALE)),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 20_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(1600.0, 3200.0, 1600.0).looking_at(Vec3::ZERO, Vec3::Y),
        PrimarySun,
    ));

    let mut pawn_transform = Transform::from_translation(PLAYER_START_POS);
    pawn_transform.look_at(Vec3::new(0.0, 100.0, 0.0), Vec3::Y);
    let (yaw, pitch) = yaw_pitch_from_transform(&pawn_transform);

    let pawn = commands
        .spawn((
            Camera3d::default(),
            pawn_transform,
            FlyCamera::new(yaw, pitch),
            Player,
            Name::new("Player"),
        ))
        .id();
    commands.spawn((PlayerController { pawn: Some(pawn) }, Name::new("PlayerController")));
}

/// Places the interactive props from the level layout.
pub fn spawn_interactive_props(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for prop in prop_layout() {
        let size = prop.kind.size();
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: prop.kind.color(),
                perceptual_roughness: 0.7,
                ..default()
            })),
            Transform::from_translation(prop.position + Vec3::Y * size.y * 0.5),
            Name::new(prop.name),
            prop.kind.interactive(),
        ));
    }
}

/// Squashes props once something has used them, keeping them on the ground.
pub fn squash_opened_props(
    mut opened: MessageReader<ContainerOpened>,
    mut props: Query<&mut Transform, With<Interactive>>,
) {
    for message in opened.read() {
        debug!("{} used by {}", message.name, message.opened_by);
        let Ok(mut transform) = props.get_mut(message.container) else {
            continue;
        };
        if transform.scale.y <= OPENED_PROP_HEIGHT_SCALE {
            continue;
        }
        let height = transform.translation.y * 2.0;
        transform.scale.y = OPENED_PROP_HEIGHT_SCALE;
        transform.translation.y = height * OPENED_PROP_HEIGHT_SCALE * 0.5;
    }
}

/// Toggles cursor grab when engaging mouse look.
pub fn update_cursor_grab(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut cursor_options: Single<&mut CursorOptions>,
) {
    if mouse_buttons.just_pressed(MouseButton::Right) {
        cursor_options.visible = false;
        cursor_options.grab_mode = CursorGrabMode::Locked;
    } else if mouse_buttons.just_released(MouseButton::Right) {
        cursor_options.visible = true;
        cursor_options.grab_mode = CursorGrabMode::None;
    }
}

/// Applies mouse look to the player when the right mouse button is held.
pub fn player_mouse_look(
    mut motion_events: MessageReader<MouseMotion>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut query: Query<(&mut FlyCamera, &mut Transform), With<Player>>,
) {
    let mut cumulative_delta = Vec2::ZERO;
    for ev in motion_events.read() {
        cumulative_delta += ev.delta;
    }

    if !mouse_buttons.pressed(MouseButton::Right) || cumulative_delta == Vec2::ZERO {
        return;
    }

    if let Ok((mut fly_cam, mut transform)) = query.single_mut() {
        fly_cam.yaw -= cumulative_delta.x * fly_cam.look_sensitivity * time.delta_secs();
        fly_cam.pitch -= cumulative_delta.y * fly_cam.look_sensitivity * time.delta_secs();
        fly_cam.pitch = fly_cam.pitch.clamp(-1.54, 1.54);

        let rotation = Quat::from_axis_angle(Vec3::Y, fly_cam.yaw)
            * Quat::from_axis_angle(Vec3::X, fly_cam.pitch);
        transform.rotation = rotation.normalize();
    }
}

/// Walks the player on the ground plane with WASD, Ctrl to sprint.
pub fn move_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<(&FlyCamera, &mut Transform), With<Player>>,
) {
    let Ok((fly_cam, mut transform)) = query.single_mut() else {
        return;
    };

    let direction = walk_direction(&keyboard, &transform);
    if direction.length_squared() > 0.0 {
        let modifier = if keyboard.pressed(KeyCode::ControlLeft) {
            2.5
        } else {
            1.0
        };
        transform.translation +=
            direction.normalize() * fly_cam.move_speed * modifier * time.delta_secs();
    }
}

fn walk_direction(keyboard: &ButtonInput<KeyCode>, transform: &Transform) -> Vec3 {
    let forward = {
        let f = transform.forward().as_vec3();
        Vec3::new(f.x, 0.0, f.z).normalize_or_zero()
    };
    let right = {
        let r = transform.right().as_vec3();
        Vec3::new(r.x, 0.0, r.z).normalize_or_zero()
    };

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction += forward;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction -= forward;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction -= right;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction += right;
    }
    direction
}

fn yaw_pitch_from_transform(transform: &Transform) -> (f32, f32) {
    let forward = -transform.forward().as_vec3();
    let yaw = forward.x.atan2(forward.z);
    let pitch = forward.y.asin();
    (yaw, pitch)
}
