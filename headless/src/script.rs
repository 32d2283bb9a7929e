//! Deterministic input script for headless runs.
//!
//! The script repeats every `CYCLE_TICKS` ticks: walk forward, veer right while
//! turning, back up to the left, then walk forward while turning back. A jump is
//! triggered every `JUMP_EVERY` ticks.

use bevy::prelude::*;
use shared::{LookAngles, MovementIntent, Player, TickCount};

pub const CYCLE_TICKS: u64 = 400;
pub const JUMP_EVERY: u64 = 120;

/// Intent and yaw change for a given tick.
pub fn scripted_input(tick: u64) -> (MovementIntent, f32) {
    let phase = tick % CYCLE_TICKS;
    let jump = tick > 0 && tick % JUMP_EVERY == 0;

    let (intent, yaw_delta) = match phase {
        0..150 => (
            MovementIntent {
                forward: true,
                ..default()
            },
            0.0,
        ),
        150..200 => (
            MovementIntent {
                forward: true,
                right: true,
                ..default()
            },
            -0.03,
        ),
        200..300 => (
            MovementIntent {
                backward: true,
                left: true,
                ..default()
            },
            0.0,
        ),
        _ => (
            MovementIntent {
                forward: true,
                ..default()
            },
            0.015,
        ),
    };

    (MovementIntent { jump, ..intent }, yaw_delta)
}

/// Feed the scripted intent for the upcoming tick.
pub fn apply_script(
    ticks: Res<TickCount>,
    mut intent: ResMut<MovementIntent>,
    mut players: Query<&mut LookAngles, With<Player>>,
) {
    let (next, yaw_delta) = scripted_input(ticks.0);
    *intent = next;
    for mut look in players.iter_mut() {
        look.yaw += yaw_delta;
    }
}
