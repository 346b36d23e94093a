//! Turing Engine - Self-regulating Gray-Scott reaction-diffusion patterns.
//!
//! This crate runs a single reaction-diffusion pattern on a toroidal grid
//! that never settles: stalled patterns are regenerated, slow steps mutate
//! the kinetic parameters, and a small diversity archive remembers
//! parameter sets that scored well under slowly shifting fitness weights.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, kinetic parameters and noise templates
//! - `compute`: Stepper, feature extraction, lifecycle and evolution
//!
//! # Example
//!
//! ```rust,no_run
//! use turing_engine::{compute::Engine, schema::EngineConfig};
//!
//! let config = EngineConfig {
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//! let mut engine = Engine::new(config).unwrap();
//!
//! for _ in 0..100 {
//!     let report = engine.tick();
//!     if report.regeneration.is_some() {
//!         println!("t={:.2}: pattern regenerated", report.time);
//!     }
//! }
//!
//! println!("Archived patterns: {}", engine.archive().len());
//! ```

pub mod compute;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{Engine, FeatureVector, Frame, Grid, PatternState, Stepper, TickReport};
pub use schema::{EngineConfig, NoiseTemplate, Params};
