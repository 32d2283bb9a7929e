//! Error types shared by map generation, tunables loading and the per-tick resolver.

use std::fmt;

/// Why a character grid could not be turned into a maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapDefect {
    /// The grid has no rows at all.
    Empty,
    /// The first row has no cells.
    ZeroWidth,
    /// A row's length differs from the first row's.
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Which piece of numeric state reached the resolver in a non-finite form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateDefect {
    Position,
    VerticalVelocity,
    Facing,
    TickDelta,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MazeError {
    /// Fatal at startup: generation is aborted.
    InvalidMap(MapDefect),
    /// Fatal for the simulation loop: ticking stops.
    InvalidState(StateDefect),
    /// Tunables failed to parse or validate.
    Config(String),
    /// A map or tunables file could not be read.
    Io { path: String, message: String },
}

impl fmt::Display for MapDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapDefect::Empty => write!(f, "map has no rows"),
            MapDefect::ZeroWidth => write!(f, "map rows have no cells"),
            MapDefect::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} cells, expected {expected} (map must be rectangular)"
            ),
        }
    }
}

impl fmt::Display for StateDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            StateDefect::Position => "player position",
            StateDefect::VerticalVelocity => "vertical velocity",
            StateDefect::Facing => "facing direction",
            StateDefect::TickDelta => "tick delta",
        };
        f.write_str(what)
    }
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidMap(defect) => write!(f, "invalid map: {defect}"),
            MazeError::InvalidState(defect) => write!(f, "invalid player state: non-finite {defect}"),
            MazeError::Config(msg) => write!(f, "invalid config: {msg}"),
            MazeError::Io { path, message } => write!(f, "failed to read {path}: {message}"),
        }
    }
}

impl std::error::Error for MazeError {}

impl From<MapDefect> for MazeError {
    fn from(defect: MapDefect) -> Self {
        MazeError::InvalidMap(defect)
    }
}

impl From<StateDefect> for MazeError {
    fn from(defect: StateDefect) -> Self {
        MazeError::InvalidState(defect)
    }
}
