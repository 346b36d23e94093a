//! Kinetic parameters for the Gray-Scott reaction.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The four Gray-Scott rate constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Diffusion rate of field A (substrate).
    pub diffusion_a: f32,
    /// Diffusion rate of field B (activator).
    pub diffusion_b: f32,
    /// Feed rate (F): replenishment of A.
    pub feed_rate: f32,
    /// Kill rate (k): removal of B.
    pub kill_rate: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            diffusion_a: 0.9,
            diffusion_b: 0.4,
            feed_rate: 0.05,
            kill_rate: 0.08,
        }
    }
}

/// Selector for a single field of [`Params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    DiffusionA,
    DiffusionB,
    FeedRate,
    KillRate,
}

impl ParamKind {
    /// Every selector, in declaration order.
    pub const ALL: [ParamKind; 4] = [
        ParamKind::DiffusionA,
        ParamKind::DiffusionB,
        ParamKind::FeedRate,
        ParamKind::KillRate,
    ];

    /// Pick a selector uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl Params {
    /// Draw parameters from the nominal pattern-forming ranges.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            diffusion_a: rng.gen_range(0.8..1.0),
            diffusion_b: rng.gen_range(0.3..0.5),
            feed_rate: rng.gen_range(0.02..0.08),
            kill_rate: rng.gen_range(0.05..0.11),
        }
    }

    /// Read one field.
    #[inline]
    pub fn get(&self, kind: ParamKind) -> f32 {
        match kind {
            ParamKind::DiffusionA => self.diffusion_a,
            ParamKind::DiffusionB => self.diffusion_b,
            ParamKind::FeedRate => self.feed_rate,
            ParamKind::KillRate => self.kill_rate,
        }
    }

    /// Overwrite one field, clamped to [0, 1].
    pub fn set(&mut self, kind: ParamKind, value: f32) {
        let value = value.clamp(0.0, 1.0);
        match kind {
            ParamKind::DiffusionA => self.diffusion_a = value,
            ParamKind::DiffusionB => self.diffusion_b = value,
            ParamKind::FeedRate => self.feed_rate = value,
            ParamKind::KillRate => self.kill_rate = value,
        }
    }

    /// Add `delta` to one field and clamp the result to [0, 1].
    pub fn nudge(&mut self, kind: ParamKind, delta: f32) {
        self.set(kind, self.get(kind) + delta);
    }

    /// Copy with every field perturbed independently by a uniform draw in
    /// `[-spread, spread]`. `spread` is capped at 1.
    pub fn perturbed<R: Rng + ?Sized>(&self, rng: &mut R, spread: f32) -> Self {
        let spread = spread.abs().min(1.0);
        let mut next = *self;
        for kind in ParamKind::ALL {
            next.nudge(kind, rng.gen_range(-spread..=spread));
        }
        next
    }

    /// Parameters as a slow function of engine time `t`.
    ///
    /// Each field sweeps its nominal range on its own sinusoid.
    pub fn drifting(t: f64) -> Self {
        let unit = |v: f64| (v * 0.5 + 0.5) as f32;
        Self {
            diffusion_a: 0.8 + 0.2 * unit(t.sin()),
            diffusion_b: 0.3 + 0.2 * unit((t * 0.7).cos()),
            feed_rate: 0.02 + 0.04 * unit((t * 0.5).sin()),
            kill_rate: 0.05 + 0.03 * unit((t * 0.3).cos()),
        }
    }
}
