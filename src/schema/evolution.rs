//! Configuration for the self-regulation machinery: mutation, regeneration,
//! fitness weighting and the diversity archive.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

/// Adaptive mutation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Wall-clock budget per step in milliseconds. Slower steps mutate.
    #[serde(default = "default_frame_budget_ms")]
    pub frame_budget_ms: f64,
    /// Mutation probability at intensity 1.0.
    #[serde(default = "default_mutation_rate")]
    pub rate: f32,
    /// Half-width of the perturbation at intensity 1.0.
    #[serde(default = "default_mutation_spread")]
    pub spread: f32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            frame_budget_ms: default_frame_budget_ms(),
            rate: default_mutation_rate(),
            spread: default_mutation_spread(),
        }
    }
}

fn default_frame_budget_ms() -> f64 {
    16.0
}
fn default_mutation_rate() -> f32 {
    0.1
}
fn default_mutation_spread() -> f32 {
    0.05
}

/// How a stalled pattern is replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerationConfig {
    /// Probability of resuming archived parameters (archive must be non-empty).
    #[serde(default = "default_resume_probability")]
    pub resume_probability: f32,
    /// Number of top archive entries eligible for resumption.
    #[serde(default = "default_resume_pool")]
    pub resume_pool: usize,
    /// Half-width of the per-field perturbation when not resuming.
    #[serde(default = "default_perturbation")]
    pub perturbation: f32,
}

impl Default for RegenerationConfig {
    fn default() -> Self {
        Self {
            resume_probability: default_resume_probability(),
            resume_pool: default_resume_pool(),
            perturbation: default_perturbation(),
        }
    }
}

fn default_resume_probability() -> f32 {
    0.3
}
fn default_resume_pool() -> usize {
    3
}
fn default_perturbation() -> f32 {
    0.05
}

/// Archive acceptance and capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Maximum number of stored entries.
    #[serde(default = "default_archive_capacity")]
    pub capacity: usize,
    /// Minimum summed feature distance to every stored entry.
    #[serde(default = "default_diversity_threshold")]
    pub diversity_threshold: f32,
    /// Below this many entries the diversity check is skipped.
    #[serde(default = "default_diversity_floor")]
    pub diversity_floor: usize,
    /// Fitness must exceed this.
    #[serde(default = "default_min_fitness")]
    pub min_fitness: f32,
    /// Pattern age (steps) must exceed this.
    #[serde(default = "default_min_age")]
    pub min_age: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            capacity: default_archive_capacity(),
            diversity_threshold: default_diversity_threshold(),
            diversity_floor: default_diversity_floor(),
            min_fitness: default_min_fitness(),
            min_age: default_min_age(),
        }
    }
}

fn default_archive_capacity() -> usize {
    10
}
fn default_diversity_threshold() -> f32 {
    0.3
}
fn default_diversity_floor() -> usize {
    3
}
fn default_min_fitness() -> f32 {
    0.6
}
fn default_min_age() -> u64 {
    50
}

/// A weight that oscillates around `base`: `base + amplitude * sin(frequency * t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatingWeight {
    pub base: f32,
    pub amplitude: f32,
    pub frequency: f32,
    #[serde(default)]
    pub phase: f32,
}

impl OscillatingWeight {
    pub const fn new(base: f32, amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self {
            base,
            amplitude,
            frequency,
            phase,
        }
    }

    /// Weight value at engine time `t`.
    ///
    /// The phase is evaluated in `f64` so the oscillation keeps its
    /// frequency for arbitrarily large `t`.
    #[inline]
    pub fn at(&self, t: f64) -> f32 {
        let angle = f64::from(self.frequency) * t + f64::from(self.phase);
        self.base + self.amplitude * angle.sin() as f32
    }
}

/// Per-feature fitness weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    pub symmetry: OscillatingWeight,
    pub complexity: OscillatingWeight,
    pub density: OscillatingWeight,
    pub dynamism: OscillatingWeight,
    pub entropy: OscillatingWeight,
    pub temporal_coherence: OscillatingWeight,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            symmetry: OscillatingWeight::new(0.2, 0.1, 0.1, 0.0),
            complexity: OscillatingWeight::new(0.2, 0.1, 0.15, FRAC_PI_2),
            density: OscillatingWeight::new(0.1, 0.05, 0.2, 0.0),
            dynamism: OscillatingWeight::new(0.15, 0.05, 0.3, 0.0),
            entropy: OscillatingWeight::new(0.15, 0.05, 0.35, FRAC_PI_2),
            temporal_coherence: OscillatingWeight::new(0.2, 0.1, 0.4, 0.0),
        }
    }
}

impl FitnessWeights {
    /// Constant weights with no oscillation.
    pub fn constant(
        symmetry: f32,
        complexity: f32,
        density: f32,
        dynamism: f32,
        entropy: f32,
        temporal_coherence: f32,
    ) -> Self {
        let flat = |base| OscillatingWeight::new(base, 0.0, 0.0, 0.0);
        Self {
            symmetry: flat(symmetry),
            complexity: flat(complexity),
            density: flat(density),
            dynamism: flat(dynamism),
            entropy: flat(entropy),
            temporal_coherence: flat(temporal_coherence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_oscillates_around_base() {
        let w = OscillatingWeight::new(0.2, 0.1, 0.1, 0.0);
        assert!((w.at(0.0) - 0.2).abs() < 1e-6);

        let peak = std::f64::consts::FRAC_PI_2 / 0.1;
        assert!((w.at(peak) - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_phase() {
        let w = FitnessWeights::default().complexity;
        // cos(0) = 1
        assert!((w.at(0.0) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_weights_bounded() {
        let weights = FitnessWeights::default();
        for i in 0..500 {
            let t = i as f64 * 0.7;
            for w in [
                weights.symmetry,
                weights.complexity,
                weights.density,
                weights.dynamism,
                weights.entropy,
                weights.temporal_coherence,
            ] {
                let v = w.at(t);
                assert!(v >= w.base - w.amplitude - 1e-6);
                assert!(v <= w.base + w.amplitude + 1e-6);
            }
        }
    }

    #[test]
    fn test_weight_keeps_full_swing_at_large_time() {
        let w = OscillatingWeight::new(0.2, 0.1, 0.1, 0.0);
        let period = std::f64::consts::TAU / 0.1;
        let samples: Vec<f32> = (0..64)
            .map(|i| w.at(1.0e6 + period * i as f64 / 64.0))
            .collect();
        let lo = samples.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(hi - lo > 0.19, "swing {lo}..{hi}");
    }
}
