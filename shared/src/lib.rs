//! Shared maze core used by both the windowed client and the headless runner
//!
//! - `map`: character grid parsing and wall/spawn generation
//! - `spatial`: boxes and the bucketed obstacle set
//! - `movement` + `physics`: the per-tick movement and collision resolver
//! - `sim`: Bevy plugin that runs the resolver

pub mod config;
pub mod error;
pub mod map;
pub mod movement;
pub mod physics;
pub mod sim;
pub mod spatial;

pub use config::*;
pub use error::*;
pub use map::*;
pub use movement::*;
pub use physics::*;
pub use sim::*;
pub use spatial::*;
