//! Compute module - Gray-Scott integration, pattern analysis and lifecycle.

mod clock;
mod engine;
mod features;
mod grid;
mod lifecycle;
mod state;
mod stepper;

pub mod evolution;

pub use clock::*;
pub use engine::*;
pub use features::*;
pub use grid::*;
pub use lifecycle::*;
pub use state::*;
pub use stepper::*;
