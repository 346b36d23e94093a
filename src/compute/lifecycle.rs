//! Stall detection and pattern regeneration.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::schema::{RegenerationConfig, StabilityConfig};

use super::PatternState;
use super::evolution::PatternArchive;

/// Counts consecutive near-static steps.
#[derive(Debug, Clone)]
pub struct StabilityMonitor {
    threshold: f32,
    trigger: u32,
}

impl StabilityMonitor {
    pub fn new(config: &StabilityConfig) -> Self {
        Self {
            threshold: config.threshold,
            trigger: config.trigger,
        }
    }

    /// Update `stable_count` from the latest change rate.
    /// Returns true if the step counted as stable.
    pub fn observe(&self, state: &mut PatternState) -> bool {
        if state.change_rate < self.threshold {
            state.stable_count = state.stable_count.saturating_add(1);
            true
        } else {
            state.stable_count = 0;
            false
        }
    }

    /// True once the stable streak exceeds the trigger.
    #[inline]
    pub fn is_stalled(&self, state: &PatternState) -> bool {
        state.stable_count > self.trigger
    }
}

/// How a regenerated pattern got its params.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Regeneration {
    /// Copied from the archive entry at `rank`.
    Resumed { rank: usize },
    /// The stalled pattern's params, jittered.
    Perturbed,
}

/// Replaces stalled patterns.
#[derive(Debug, Clone)]
pub struct LifecycleController {
    config: RegenerationConfig,
}

impl LifecycleController {
    pub fn new(config: RegenerationConfig) -> Self {
        Self { config }
    }

    /// Build a fresh pattern to replace `current`.
    ///
    /// With a non-empty archive, resumes from one of the top entries with
    /// probability `resume_probability`. Otherwise perturbs the current
    /// params. Either way the fields are reset and re-seeded.
    pub fn regenerate<R: Rng + ?Sized>(
        &self,
        current: &PatternState,
        archive: &PatternArchive,
        rng: &mut R,
    ) -> (PatternState, Regeneration) {
        let resumed = if !archive.is_empty() && rng.r#gen::<f32>() < self.config.resume_probability {
            archive
                .pick_top(self.config.resume_pool, rng)
                .map(|(rank, entry)| (entry.params, Regeneration::Resumed { rank }))
        } else {
            None
        };

        let (params, how) = resumed.unwrap_or_else(|| {
            (
                current.params.perturbed(rng, self.config.perturbation),
                Regeneration::Perturbed,
            )
        });

        (current.respawn(params, rng), how)
    }
}
