//! Open-ended evolution of running patterns.
//!
//! # Overview
//!
//! - **Mutation** (`mutation`): params drift when steps overrun their frame budget
//! - **Fitness** (`fitness`): feature vectors scored with oscillating weights
//! - **Archive** (`archive`): bounded, diversity-filtered store of good params
//!
//! Nothing here converges. Fitness weights keep moving and the archive
//! only seeds regenerated patterns, so the system wanders rather than
//! optimizes.
//!
//! # Example
//!
//! ```rust
//! use turing_engine::compute::evolution::{ArchiveEntry, FitnessEvaluator, PatternArchive};
//! use turing_engine::compute::{FeatureVector, Grid};
//! use turing_engine::schema::{ArchiveConfig, FitnessWeights, Params};
//!
//! let grid = Grid::new(16, 16).unwrap();
//! let features = FeatureVector::extract(&grid, None);
//! let fitness = FitnessEvaluator::new(FitnessWeights::default()).evaluate(&features, 0.0);
//!
//! let mut archive = PatternArchive::new(ArchiveConfig::default());
//! archive.offer(ArchiveEntry { params: Params::default(), fitness, features, age: 100 });
//! println!("archived: {}", archive.len());
//! ```

mod archive;
mod fitness;
mod mutation;

pub use archive::{ArchiveEntry, PatternArchive};
pub use fitness::FitnessEvaluator;
pub use mutation::{AdaptiveMutator, Mutation};
