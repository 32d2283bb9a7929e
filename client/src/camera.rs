//! First-person camera
//!
//! The player position is already at eye height, so the camera sits exactly on it.

use bevy::prelude::*;
use shared::{LookAngles, Player, PlayerState};

/// Vertical field of view
const FOV: f32 = 75.0_f32.to_radians();

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: FOV,
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_xyz(0.0, 1.8, 0.0),
    ));
}

/// Place the camera at the player's eye and apply the look rotation
pub fn update_camera(
    player_query: Query<(&PlayerState, &LookAngles), With<Player>>,
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
) {
    let Ok((state, look)) = player_query.single() else {
        return;
    };

    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    camera_transform.translation = state.position;
    camera_transform.rotation = look.rotation();
}
