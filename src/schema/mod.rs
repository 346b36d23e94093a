//! Schema module - Configuration, parameter and noise-template types.

mod config;
mod evolution;
mod noise;
mod params;

pub use config::*;
pub use evolution::*;
pub use noise::*;
pub use params::*;
