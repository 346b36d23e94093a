//! Engine configuration and validation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ArchiveConfig, FitnessWeights, MutationConfig, RegenerationConfig};

fn default_width() -> usize {
    80
}
fn default_height() -> usize {
    80
}
fn default_steps_per_tick() -> usize {
    3
}
fn default_dt() -> f32 {
    0.2
}
fn default_true() -> bool {
    true
}
fn default_time_step() -> f64 {
    0.01
}
fn default_history_depth() -> usize {
    10
}

/// Top-level engine configuration.
///
/// All values are fixed at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Grid width in cells.
    #[serde(default = "default_width")]
    pub width: usize,
    /// Grid height in cells.
    #[serde(default = "default_height")]
    pub height: usize,
    /// Stepper invocations per tick.
    #[serde(default = "default_steps_per_tick")]
    pub steps_per_tick: usize,
    /// Integration time step.
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Replace the pattern once it stalls.
    #[serde(default = "default_true")]
    pub auto_regenerate: bool,
    /// Override params each tick with slow sinusoids of engine time.
    #[serde(default)]
    pub autonomous_drift: bool,
    /// Engine clock advance per tick (drives fitness weights and drift).
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// Seed for the engine RNG. `None` seeds from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Number of prior field-A snapshots kept per pattern.
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    #[serde(default)]
    pub stability: StabilityConfig,
    #[serde(default)]
    pub mutation: MutationConfig,
    #[serde(default)]
    pub regeneration: RegenerationConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub fitness: FitnessWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            steps_per_tick: default_steps_per_tick(),
            dt: default_dt(),
            auto_regenerate: true,
            autonomous_drift: false,
            time_step: default_time_step(),
            random_seed: None,
            history_depth: default_history_depth(),
            stability: StabilityConfig::default(),
            mutation: MutationConfig::default(),
            regeneration: RegenerationConfig::default(),
            archive: ArchiveConfig::default(),
            fitness: FitnessWeights::default(),
        }
    }
}

/// Stall detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityConfig {
    /// A step whose change rate falls below this counts as stable.
    #[serde(default = "default_stability_threshold")]
    pub threshold: f32,
    /// Regenerate once the stable streak exceeds this.
    #[serde(default = "default_stable_trigger")]
    pub trigger: u32,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            threshold: default_stability_threshold(),
            trigger: default_stable_trigger(),
        }
    }
}

fn default_stability_threshold() -> f32 {
    0.0001
}
fn default_stable_trigger() -> u32 {
    30
}

impl EngineConfig {
    /// Get total grid size (width * height).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.steps_per_tick == 0 {
            return Err(ConfigError::InvalidStepsPerTick);
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        if self.history_depth == 0 {
            return Err(ConfigError::InvalidHistoryDepth);
        }
        if self.archive.capacity == 0 {
            return Err(ConfigError::InvalidArchiveCapacity);
        }
        if !(self.mutation.frame_budget_ms.is_finite() && self.mutation.frame_budget_ms > 0.0) {
            return Err(ConfigError::InvalidFrameBudget(self.mutation.frame_budget_ms));
        }
        for (name, value) in [
            ("mutation.rate", self.mutation.rate),
            (
                "regeneration.resume_probability",
                self.regeneration.resume_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        for (name, value) in [
            ("mutation.spread", self.mutation.spread),
            ("regeneration.perturbation", self.regeneration.perturbation),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidSpread { name, value });
            }
        }
        if !(self.time_step.is_finite() && self.time_step >= 0.0) {
            return Err(ConfigError::InvalidClockStep(self.time_step));
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Steps per tick must be non-zero")]
    InvalidStepsPerTick,
    #[error("Time step must be positive and finite (got {0})")]
    InvalidTimeStep(f32),
    #[error("History depth must be non-zero")]
    InvalidHistoryDepth,
    #[error("Archive capacity must be non-zero")]
    InvalidArchiveCapacity,
    #[error("Frame budget must be positive and finite (got {0} ms)")]
    InvalidFrameBudget(f64),
    #[error("{name} must be a probability in [0, 1] (got {value})")]
    InvalidProbability { name: &'static str, value: f32 },
    #[error("{name} must be within [0, 1] (got {value})")]
    InvalidSpread { name: &'static str, value: f32 },
    #[error("Engine time step must be non-negative and finite (got {0})")]
    InvalidClockStep(f64),
    #[error("Pattern is {found:?} but the config expects {expected:?}")]
    StateMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
