//! Gray-Scott diffusion-reaction stepper.
//!
//! Each step reads the current fields through a 3x3 toroidal stencil and
//! writes into pre-allocated buffers that are swapped in afterwards, so no
//! cell ever sees a partially updated neighbourhood.

use crate::schema::Params;

use super::{Grid, PatternState};

/// Default integration time step.
pub const DEFAULT_DT: f32 = 0.2;

/// Double-buffered Gray-Scott integrator.
#[derive(Debug, Clone)]
pub struct Stepper {
    dt: f32,
    /// Pre-allocated buffers for the next state (reused each step).
    next_a: Vec<f32>,
    next_b: Vec<f32>,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new(DEFAULT_DT)
    }
}

impl Stepper {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            next_a: Vec::new(),
            next_b: Vec::new(),
        }
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Advance the grid one time step and return the change rate
    /// (`sum(|dA| + |dB|) / cells`).
    pub fn step_grid(&mut self, grid: &mut Grid, params: &Params) -> f32 {
        let size = grid.len();
        self.next_a.resize(size, 0.0);
        self.next_b.resize(size, 0.0);

        let dt = self.dt;
        let Params {
            diffusion_a,
            diffusion_b,
            feed_rate,
            kill_rate,
        } = *params;

        let mut total_change = 0.0f32;

        for y in 0..grid.height as i64 {
            for x in 0..grid.width as i64 {
                let i = grid.index(x, y);

                let mut sum_a = 0.0f32;
                let mut sum_b = 0.0f32;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let n = grid.index(x + dx, y + dy);
                        sum_a += grid.a[n];
                        sum_b += grid.b[n];
                    }
                }

                let a = grid.a[i];
                let b = grid.b[i];

                let lap_a = sum_a / 9.0 - a;
                let lap_b = sum_b / 9.0 - b;
                let reaction = a * b * b;

                let next_a = (a + (diffusion_a * lap_a - reaction + feed_rate * (1.0 - a)) * dt)
                    .clamp(0.0, 1.0);
                let next_b = (b
                    + (diffusion_b * lap_b + reaction - (kill_rate + feed_rate) * b) * dt)
                    .clamp(0.0, 1.0);

                total_change += (next_a - a).abs() + (next_b - b).abs();

                self.next_a[i] = next_a;
                self.next_b[i] = next_b;
            }
        }

        // Swap fields (no allocation, just pointer swap)
        std::mem::swap(&mut grid.a, &mut self.next_a);
        std::mem::swap(&mut grid.b, &mut self.next_b);

        total_change / size as f32
    }

    /// Advance a pattern one step.
    ///
    /// The outgoing field A is recorded into the pattern's history first.
    /// Updates `change_rate` and `age`; stall tracking is left to the
    /// stability monitor.
    pub fn step(&mut self, state: &mut PatternState) -> f32 {
        state.history.record(&state.grid.a);
        let change_rate = self.step_grid(&mut state.grid, &state.params);
        state.change_rate = change_rate;
        state.age += 1;
        change_rate
    }

    /// Run a pattern for the specified number of steps.
    pub fn run(&mut self, state: &mut PatternState, steps: u64) {
        for _ in 0..steps {
            self.step(state);
        }
    }
}
