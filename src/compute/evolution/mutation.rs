//! Adaptive mutation driven by step wall time.
//!
//! When a step overruns its frame budget the controller may nudge one
//! kinetic parameter, with probability and magnitude proportional to the
//! overrun. The drift direction carries no meaning; slow environments simply
//! wander through parameter space.

use rand::Rng;
use rand_distr::Uniform;

use crate::schema::{MutationConfig, ParamKind, Params};

/// A single applied mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mutation {
    pub kind: ParamKind,
    /// Perturbation drawn before clamping.
    pub delta: f32,
    pub intensity: f32,
}

/// Mutates params in response to slow steps.
#[derive(Debug, Clone)]
pub struct AdaptiveMutator {
    config: MutationConfig,
}

impl AdaptiveMutator {
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }

    /// Overrun ratio `elapsed / budget`, if the step exceeded its budget.
    pub fn intensity(&self, elapsed_ms: f64) -> Option<f32> {
        let budget = self.config.frame_budget_ms;
        (elapsed_ms > budget).then(|| (elapsed_ms / budget) as f32)
    }

    /// With probability `rate * intensity`, perturb one uniformly chosen
    /// field by a uniform draw in `[-spread * intensity, spread * intensity]`.
    ///
    /// The half-width is capped at 1, the full extent of a param.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        params: &mut Params,
        intensity: f32,
        rng: &mut R,
    ) -> Option<Mutation> {
        if !(intensity.is_finite() && intensity > 0.0) {
            return None;
        }
        let probability = self.config.rate * intensity;
        if rng.r#gen::<f32>() >= probability {
            return None;
        }

        let kind = ParamKind::random(rng);
        let spread = (self.config.spread * intensity).abs().min(1.0);
        let delta = rng.sample(Uniform::new_inclusive(-spread, spread));
        params.nudge(kind, delta);

        Some(Mutation {
            kind,
            delta,
            intensity,
        })
    }

    /// React to a timed step. Steps within budget leave params untouched.
    pub fn observe<R: Rng + ?Sized>(
        &self,
        params: &mut Params,
        elapsed_ms: f64,
        rng: &mut R,
    ) -> Option<Mutation> {
        let intensity = self.intensity(elapsed_ms)?;
        self.mutate(params, intensity, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mutator() -> AdaptiveMutator {
        AdaptiveMutator::new(MutationConfig::default())
    }

    #[test]
    fn test_within_budget_no_mutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut params = Params::default();
        for elapsed in [0.0, 8.0, 16.0] {
            assert!(mutator().observe(&mut params, elapsed, &mut rng).is_none());
        }
        assert_eq!(params, Params::default());
    }

    #[test]
    fn test_intensity_ratio() {
        assert_eq!(mutator().intensity(32.0), Some(2.0));
        assert_eq!(mutator().intensity(16.0), None);
    }

    #[test]
    fn test_huge_overrun_always_mutates_within_spread() {
        let mut rng = StdRng::seed_from_u64(2);
        let m = mutator();
        // intensity 20 => probability 2.0, spread 1.0
        for _ in 0..50 {
            let mut params = Params::default();
            let mutation = m.observe(&mut params, 320.0, &mut rng).unwrap();
            assert!(mutation.delta.abs() <= 1.0);
            assert_eq!(mutation.intensity, 20.0);
            let changed = ParamKind::ALL
                .into_iter()
                .filter(|&k| params.get(k) != Params::default().get(k))
                .count();
            assert!(changed <= 1);
            assert!((0.0..=1.0).contains(&params.get(mutation.kind)));
        }
    }

    #[test]
    fn test_mutation_frequency_scales_with_intensity() {
        let m = mutator();
        let count = |intensity: f32| {
            let mut rng = StdRng::seed_from_u64(9);
            (0..4000)
                .filter(|_| {
                    let mut params = Params::default();
                    m.mutate(&mut params, intensity, &mut rng).is_some()
                })
                .count()
        };

        let low = count(1.5);
        let high = count(6.0);
        // Expected ~600 and ~2400.
        assert!(low > 400 && low < 800, "low = {low}");
        assert!(high > 2100 && high < 2700, "high = {high}");
    }

    #[test]
    fn test_oversized_spread_capped() {
        let mut rng = StdRng::seed_from_u64(11);
        let m = AdaptiveMutator::new(MutationConfig {
            rate: 1.0,
            spread: 1e37,
            ..Default::default()
        });
        for _ in 0..50 {
            let mut params = Params::default();
            let mutation = m.observe(&mut params, 1600.0, &mut rng).unwrap();
            assert!(mutation.delta.abs() <= 1.0);
            assert!((0.0..=1.0).contains(&params.get(mutation.kind)));
        }
    }

    #[test]
    fn test_invalid_intensity_ignored() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut params = Params::default();
        assert!(mutator().mutate(&mut params, f32::NAN, &mut rng).is_none());
        assert!(mutator().mutate(&mut params, 0.0, &mut rng).is_none());
    }
}
