//! Player input handling
//!
//! Raw key state is snapshotted into the shared `MovementIntent` once per frame;
//! mouse motion turns the player's `LookAngles`.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use shared::{LookAngles, MovementIntent, Player};
use std::f32::consts::FRAC_PI_2;

use crate::states::GameState;

/// Mouse sensitivity for look (radians per pixel)
const MOUSE_SENSITIVITY: f32 = 0.002;

/// Handle keyboard input for movement
pub fn handle_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    game_state: Res<State<GameState>>,
    mut intent: ResMut<MovementIntent>,
) {
    if game_state.get() == &GameState::Paused {
        *intent = MovementIntent::idle();
        return;
    }

    intent.forward = keyboard.pressed(KeyCode::KeyW);
    intent.backward = keyboard.pressed(KeyCode::KeyS);
    intent.left = keyboard.pressed(KeyCode::KeyA);
    intent.right = keyboard.pressed(KeyCode::KeyD);
    // Latched until a tick consumes it.
    if keyboard.just_pressed(KeyCode::Space) {
        intent.jump = true;
    }
}

/// Handle mouse input for looking around
pub fn handle_mouse_input(
    mut mouse_motion: MessageReader<MouseMotion>,
    mut players: Query<&mut LookAngles, With<Player>>,
) {
    let mut delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        delta += motion.delta;
    }

    if delta == Vec2::ZERO {
        return;
    }

    for mut look in players.iter_mut() {
        look.yaw -= delta.x * MOUSE_SENSITIVITY;
        look.pitch -= delta.y * MOUSE_SENSITIVITY;
        look.pitch = look.pitch.clamp(-FRAC_PI_2 + 0.01, FRAC_PI_2 - 0.01);
    }
}
