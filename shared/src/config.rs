//! Tunable simulation and world constants.
//!
//! Every value has a default matching the reference maze. Binaries may override
//! any subset from a RON file (`assets/maze.ron`), e.g.:
//!
//! ```ron
//! (
//!     move_speed: 2.0,
//!     cadence: FixedRate,
//! )
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::MazeError;

/// Horizontal walk speed (units per second)
pub const DEFAULT_MOVE_SPEED: f32 = 1.0;

/// Upward speed given by a jump (units per second)
pub const DEFAULT_JUMP_SPEED: f32 = 10.0;

/// Downward acceleration (units per second^2, positive = down)
pub const DEFAULT_GRAVITY: f32 = 30.0;

/// Eye height: the player position never drops below this Y.
pub const DEFAULT_EYE_HEIGHT: f32 = 1.8;

/// Half-extents of the player's collision box (full size 0.5 x 1.8 x 0.5)
pub const DEFAULT_PLAYER_HALF_EXTENTS: [f32; 3] = [0.25, 0.9, 0.25];

/// Size of a wall cell. Y is also the ceiling height.
pub const DEFAULT_WALL_SIZE: [f32; 3] = [1.0, 2.0, 1.0];

/// Logical duration of one tick, independent of wall-clock frame time.
pub const DEFAULT_TICK_DT: f32 = 0.02;

/// Upper bound for any wall or player box dimension. Keeps the obstacle bucket
/// span of a single box small.
pub const MAX_BOX_EXTENT: f32 = 1000.0;

/// When the resolver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickCadence {
    /// Once per rendered frame, always advancing by `tick_dt`.
    #[default]
    PerFrame,
    /// On Bevy's fixed clock with period `tick_dt` (real-time paced).
    FixedRate,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub eye_height: f32,
    pub player_half_extents: [f32; 3],
    pub wall_size: [f32; 3],
    pub tick_dt: f32,
    pub cadence: TickCadence,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            jump_speed: DEFAULT_JUMP_SPEED,
            gravity: DEFAULT_GRAVITY,
            eye_height: DEFAULT_EYE_HEIGHT,
            player_half_extents: DEFAULT_PLAYER_HALF_EXTENTS,
            wall_size: DEFAULT_WALL_SIZE,
            tick_dt: DEFAULT_TICK_DT,
            cadence: TickCadence::PerFrame,
        }
    }
}

impl MazeConfig {
    #[inline]
    pub fn player_half_extents(&self) -> Vec3 {
        Vec3::from_array(self.player_half_extents)
    }

    #[inline]
    pub fn wall_size(&self) -> Vec3 {
        Vec3::from_array(self.wall_size)
    }

    /// Ceiling Y, equal to the wall height.
    #[inline]
    pub fn ceiling_height(&self) -> f32 {
        self.wall_size[1]
    }

    /// Parse tunables from RON text. Omitted fields keep their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, MazeError> {
        let config: MazeConfig =
            ron::from_str(text).map_err(|e| MazeError::Config(format!("RON parse failed: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load tunables from a RON file. A missing file yields the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, MazeError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No tunables file at {:?}; using defaults", path);
            return Ok(Self::default());
        }
        Self::load_required(path)
    }

    /// Load tunables from a RON file the user asked for. A missing file is an error.
    pub fn load_required(path: impl AsRef<Path>) -> Result<Self, MazeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MazeError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_ron_str(&text)
    }

    /// Reject values the resolver cannot integrate safely.
    pub fn validate(&self) -> Result<(), MazeError> {
        let positive = [
            ("eye_height", self.eye_height),
            ("tick_dt", self.tick_dt),
            ("player_half_extents.x", self.player_half_extents[0]),
            ("player_half_extents.y", self.player_half_extents[1]),
            ("player_half_extents.z", self.player_half_extents[2]),
            ("wall_size.x", self.wall_size[0]),
            ("wall_size.y", self.wall_size[1]),
            ("wall_size.z", self.wall_size[2]),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(MazeError::Config(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        let extents = [
            ("player_half_extents.x", self.player_half_extents[0]),
            ("player_half_extents.y", self.player_half_extents[1]),
            ("player_half_extents.z", self.player_half_extents[2]),
            ("wall_size.x", self.wall_size[0]),
            ("wall_size.y", self.wall_size[1]),
            ("wall_size.z", self.wall_size[2]),
        ];
        for (name, value) in extents {
            if value > MAX_BOX_EXTENT {
                return Err(MazeError::Config(format!(
                    "{name} must be at most {MAX_BOX_EXTENT}, got {value}"
                )));
            }
        }

        let non_negative = [
            ("move_speed", self.move_speed),
            ("jump_speed", self.jump_speed),
            ("gravity", self.gravity),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(MazeError::Config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_maze() {
        let cfg = MazeConfig::default();
        assert_eq!(cfg.move_speed, 1.0);
        assert_eq!(cfg.jump_speed, 10.0);
        assert_eq!(cfg.gravity, 30.0);
        assert_eq!(cfg.eye_height, 1.8);
        assert_eq!(cfg.player_half_extents(), Vec3::new(0.25, 0.9, 0.25));
        assert_eq!(cfg.wall_size(), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(cfg.ceiling_height(), 2.0);
        assert_eq!(cfg.tick_dt, 0.02);
        assert_eq!(cfg.cadence, TickCadence::PerFrame);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let cfg = MazeConfig::from_ron_str("(move_speed: 2.5, cadence: FixedRate)").unwrap();
        assert_eq!(cfg.move_speed, 2.5);
        assert_eq!(cfg.cadence, TickCadence::FixedRate);
        assert_eq!(cfg.gravity, DEFAULT_GRAVITY);
        assert_eq!(cfg.tick_dt, DEFAULT_TICK_DT);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = MazeConfig::from_ron_str("(tick_dt: 0.0)").unwrap_err();
        assert!(matches!(err, MazeError::Config(_)));

        let err = MazeConfig::from_ron_str("(gravity: -1.0)").unwrap_err();
        assert!(matches!(err, MazeError::Config(_)));

        let cfg = MazeConfig {
            eye_height: f32::NAN,
            ..default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_malformed_ron_is_config_error() {
        let err = MazeConfig::from_ron_str("(move_speed: fast)").unwrap_err();
        assert!(matches!(err, MazeError::Config(_)));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let cfg = MazeConfig::load_from_file("definitely/not/here/maze.ron").unwrap();
        assert_eq!(cfg, MazeConfig::default());
    }

    #[test]
    fn test_required_file_must_exist() {
        let err = MazeConfig::load_required("definitely/not/here/maze.ron").unwrap_err();
        assert!(matches!(err, MazeError::Io { .. }));
    }

    #[test]
    fn test_rejects_oversized_boxes() {
        let err = MazeConfig::from_ron_str("(wall_size: (1e30, 2.0, 1.0))").unwrap_err();
        assert!(matches!(err, MazeError::Config(_)));

        let err = MazeConfig::from_ron_str("(player_half_extents: (0.25, 5000.0, 0.25))").unwrap_err();
        assert!(matches!(err, MazeError::Config(_)));

        let cfg = MazeConfig {
            wall_size: [MAX_BOX_EXTENT, 2.0, 1.0],
            ..default()
        };
        assert!(cfg.validate().is_ok());
    }
}
