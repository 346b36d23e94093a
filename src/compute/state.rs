//! Pattern state: the grid, its kinetic parameters and lifecycle counters.

use std::collections::VecDeque;

use rand::Rng;

use crate::schema::{ConfigError, NoiseTemplate, Params};

use super::Grid;

/// Fixed-capacity FIFO of prior field-A snapshots, oldest evicted first.
///
/// Evicted buffers are reused for the next snapshot, so a full history
/// records without allocating.
#[derive(Debug, Clone)]
pub struct History {
    frames: VecDeque<Vec<f32>>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Copy `frame` in as the newest snapshot.
    pub fn record(&mut self, frame: &[f32]) {
        if self.capacity == 0 {
            return;
        }
        let mut buf = if self.frames.len() >= self.capacity {
            self.frames.pop_front().unwrap_or_default()
        } else {
            Vec::with_capacity(frame.len())
        };
        buf.clear();
        buf.extend_from_slice(frame);
        self.frames.push_back(buf);
    }

    /// Most recently recorded snapshot.
    pub fn latest(&self) -> Option<&[f32]> {
        self.frames.back().map(Vec::as_slice)
    }

    /// Snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.frames.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// One running pattern.
///
/// The stepper and mutation controller modify it tick by tick; the
/// lifecycle controller replaces it wholesale when it stalls.
#[derive(Debug, Clone)]
pub struct PatternState {
    pub grid: Grid,
    pub params: Params,
    /// Mean absolute per-cell change of the last step.
    pub change_rate: f32,
    /// Consecutive steps with change below the stability threshold.
    pub stable_count: u32,
    /// Steps taken since creation.
    pub age: u64,
    /// Fitness from the latest evaluation.
    pub fitness: f32,
    /// Template used for the initial noise pass, if any.
    pub noise: Option<NoiseTemplate>,
    pub history: History,
}

impl PatternState {
    /// Fresh pattern with random params and one random noise pass.
    pub fn new<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        history_depth: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let params = Params::random(rng);
        Self::seeded(width, height, history_depth, params, rng)
    }

    /// Fresh pattern with the given params and one random noise pass.
    pub fn seeded<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        history_depth: usize,
        params: Params,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let mut state = Self::blank(width, height, history_depth, params)?;
        let template = NoiseTemplate::random(rng);
        state.inject_noise(template, rng);
        Ok(state)
    }

    /// Pattern with A = 1, B = 0 and no noise.
    pub fn blank(
        width: usize,
        height: usize,
        history_depth: usize,
        params: Params,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            grid: Grid::new(width, height)?,
            params,
            change_rate: 1.0,
            stable_count: 0,
            age: 0,
            fitness: 0.0,
            noise: None,
            history: History::new(history_depth),
        })
    }

    /// Fresh pattern of the same shape and history depth, with `params`
    /// and one random noise pass.
    pub fn respawn<R: Rng + ?Sized>(&self, params: Params, rng: &mut R) -> Self {
        let size = self.grid.len();
        let mut state = Self {
            grid: Grid {
                width: self.grid.width,
                height: self.grid.height,
                a: vec![1.0; size],
                b: vec![0.0; size],
            },
            params,
            change_rate: 1.0,
            stable_count: 0,
            age: 0,
            fitness: 0.0,
            noise: None,
            history: History::new(self.history.capacity()),
        };
        let template = NoiseTemplate::random(rng);
        state.inject_noise(template, rng);
        state
    }

    /// Apply a noise template to field B. Returns the number of assignments.
    pub fn inject_noise<R: Rng + ?Sized>(&mut self, template: NoiseTemplate, rng: &mut R) -> usize {
        self.noise = Some(template);
        let (w, h) = (self.grid.width, self.grid.height);
        template.apply(&mut self.grid.b, w, h, rng)
    }

    /// Field A as it was before the last step.
    #[inline]
    pub fn previous_a(&self) -> Option<&[f32]> {
        self.history.latest()
    }
}
