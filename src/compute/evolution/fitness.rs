//! Fitness scoring with slowly oscillating feature weights.
//!
//! Weights drift with engine time, so the same feature vector can score
//! differently from one moment to the next.

use crate::compute::FeatureVector;
use crate::schema::FitnessWeights;

/// Scores feature vectors.
#[derive(Debug, Clone, Default)]
pub struct FitnessEvaluator {
    weights: FitnessWeights,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(weights: FitnessWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    /// Weight values at time `t`, in [`FeatureVector::as_array`] order.
    pub fn weights_at(&self, t: f64) -> [f32; 6] {
        let w = &self.weights;
        [
            w.symmetry.at(t),
            w.complexity.at(t),
            w.density.at(t),
            w.dynamism.at(t),
            w.entropy.at(t),
            w.temporal_coherence.at(t),
        ]
    }

    /// Weighted sum of the features at time `t`.
    pub fn evaluate(&self, features: &FeatureVector, t: f64) -> f32 {
        features
            .as_array()
            .iter()
            .zip(self.weights_at(t))
            .map(|(f, w)| f * w)
            .sum()
    }
}
