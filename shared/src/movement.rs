//! Movement intent and horizontal displacement.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Directional and jump signals for one tick.
///
/// The host samples its input layer into this value once per tick; the
/// resolver never reads raw key state.
#[derive(Resource, Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Jump trigger. Only honoured while grounded.
    pub jump: bool,
}

impl MovementIntent {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Local-space direction: x = strafe (right positive), y = forward positive.
    /// Opposing intents cancel; a non-zero result is unit length.
    pub fn local_direction(&self) -> Vec2 {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(
            axis(self.right, self.left),
            axis(self.forward, self.backward),
        )
        .normalize_or_zero()
    }
}

/// Look direction for a yaw/pitch pair.
/// In Bevy: +X is right, +Y is up, -Z is forward at yaw 0.
pub fn facing_from_look(yaw: f32, pitch: f32) -> Vec3 {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0) * Vec3::NEG_Z
}

/// World-space horizontal displacement for one tick. The Y component is always zero.
pub fn horizontal_displacement(intent: &MovementIntent, facing: Vec3, speed: f32, dt: f32) -> Vec3 {
    let local = intent.local_direction();
    if local == Vec2::ZERO {
        return Vec3::ZERO;
    }

    let flat_facing = Vec3::new(facing.x, 0.0, facing.z).normalize_or_zero();
    // Up x facing points to the player's left.
    let side = Vec3::Y.cross(flat_facing);

    (flat_facing * local.y - side * local.x) * (speed * dt)
}
