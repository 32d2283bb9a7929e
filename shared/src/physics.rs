//! Per-tick player physics: walk, jump, gravity and wall collision.
//!
//! Horizontal and vertical responses are independent. A blocked move only
//! undoes the horizontal displacement of that tick; falling and rising carry on
//! even while the player is pressed against a wall.

use bevy::prelude::*;

use crate::config::MazeConfig;
use crate::error::{MazeError, StateDefect};
use crate::movement::{horizontal_displacement, MovementIntent};
use crate::spatial::{Aabb, ObstacleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalState {
    Grounded,
    Airborne,
}

/// Kinematic state of the player. Only the Y velocity is ever non-zero.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub grounded: bool,
}

impl PlayerState {
    /// Fresh state at a spawn point. Not grounded until the first ground contact.
    pub fn spawn_at(position: Vec3) -> Self {
        Self {
            position,
            vertical_velocity: 0.0,
            grounded: false,
        }
    }

    pub fn vertical_state(&self) -> VerticalState {
        if self.grounded {
            VerticalState::Grounded
        } else {
            VerticalState::Airborne
        }
    }

    /// True when position and velocity hold no NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.vertical_velocity.is_finite()
    }

    fn check_finite(&self) -> Result<(), MazeError> {
        if self.is_finite() {
            return Ok(());
        }
        if !self.position.is_finite() {
            return Err(StateDefect::Position.into());
        }
        if !self.vertical_velocity.is_finite() {
            return Err(StateDefect::VerticalVelocity.into());
        }
        Ok(())
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub state: PlayerState,
    /// Obstacle that blocked the horizontal move, if any.
    pub blocked_by: Option<usize>,
}

/// Player collision box centred on `position`.
#[inline]
pub fn collision_box(position: Vec3, config: &MazeConfig) -> Aabb {
    Aabb::from_center_half_extents(position, config.player_half_extents())
}

/// Advance the player by one tick of `dt` seconds.
///
/// 1. Move horizontally along the flattened facing.
/// 2. Jump (grounded only), integrate gravity, clamp to eye height.
/// 3. If the new box touches an obstacle, undo step 1 and keep step 2.
pub fn step_player(
    intent: &MovementIntent,
    facing: Vec3,
    state: &PlayerState,
    obstacles: &ObstacleSet,
    config: &MazeConfig,
    dt: f32,
) -> Result<StepOutcome, MazeError> {
    state.check_finite()?;
    if !facing.is_finite() {
        return Err(StateDefect::Facing.into());
    }
    if !dt.is_finite() || dt <= 0.0 {
        return Err(StateDefect::TickDelta.into());
    }

    let mut next = *state;

    // --- Horizontal (tentative) ---
    let displacement = horizontal_displacement(intent, facing, config.move_speed, dt);
    next.position += displacement;

    // --- Jump ---
    if intent.jump && next.grounded {
        next.vertical_velocity = config.jump_speed;
        next.grounded = false;
    }

    // --- Gravity ---
    next.vertical_velocity -= config.gravity * dt;
    next.position.y += next.vertical_velocity * dt;

    // --- Ground clamp ---
    if next.position.y < config.eye_height {
        next.position.y = config.eye_height;
        next.vertical_velocity = 0.0;
        next.grounded = true;
    }

    // --- Walls (horizontal only) ---
    let blocked_by = obstacles.first_hit(&collision_box(next.position, config));
    if blocked_by.is_some() {
        next.position.x = state.position.x;
        next.position.z = state.position.z;
    }

    next.check_finite()?;

    Ok(StepOutcome {
        state: next,
        blocked_by,
    })
}
