//! Toroidal two-field lattice.

use serde::{Deserialize, Serialize};

use crate::schema::ConfigError;

/// Two same-shaped scalar fields over a borderless lattice.
///
/// Data is stored row-major: `index = y * width + x`. Every value is kept in
/// [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Grid width (X dimension).
    pub width: usize,
    /// Grid height (Y dimension).
    pub height: usize,
    /// Field A (substrate).
    pub a: Vec<f32>,
    /// Field B (activator).
    pub b: Vec<f32>,
}

impl Grid {
    /// Create a grid with A filled to 1.0 and B filled to 0.0.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        Self::filled(width, height, 1.0, 0.0)
    }

    /// Create a grid with both fields set to constants (clamped to [0, 1]).
    pub fn filled(width: usize, height: usize, a: f32, b: f32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        let size = width * height;
        Ok(Self {
            width,
            height,
            a: vec![a.clamp(0.0, 1.0); size],
            b: vec![b.clamp(0.0, 1.0); size],
        })
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always false for a constructed grid; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map any integer coordinate to a flat offset, wrapping on both axes.
    #[inline]
    pub fn index(&self, x: i64, y: i64) -> usize {
        let w = self.width as i64;
        let h = self.height as i64;
        (x.rem_euclid(w) + y.rem_euclid(h) * w) as usize
    }

    /// Field A at a (wrapped) coordinate.
    #[inline]
    pub fn a_at(&self, x: i64, y: i64) -> f32 {
        self.a[self.index(x, y)]
    }

    /// Field B at a (wrapped) coordinate.
    #[inline]
    pub fn b_at(&self, x: i64, y: i64) -> f32 {
        self.b[self.index(x, y)]
    }

    /// Check the length and range invariants.
    pub fn is_consistent(&self) -> bool {
        let size = self.len();
        self.a.len() == size
            && self.b.len() == size
            && self
                .a
                .iter()
                .chain(self.b.iter())
                .all(|v| (0.0..=1.0).contains(v))
    }
}

/// Grid statistics for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridStats {
    pub mean_a: f32,
    pub min_a: f32,
    pub max_a: f32,
    pub mean_b: f32,
    pub min_b: f32,
    pub max_b: f32,
    /// Cells where B exceeds 1e-3.
    pub active_cells: usize,
}

impl GridStats {
    /// Compute statistics from a grid.
    pub fn from_grid(grid: &Grid) -> Self {
        let (mean_a, min_a, max_a) = summarize(&grid.a);
        let (mean_b, min_b, max_b) = summarize(&grid.b);
        let active_cells = grid.b.iter().filter(|&&v| v > 1e-3).count();

        Self {
            mean_a,
            min_a,
            max_a,
            mean_b,
            min_b,
            max_b,
            active_cells,
        }
    }
}

fn summarize(field: &[f32]) -> (f32, f32, f32) {
    let mut sum = 0.0f32;
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in field {
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }
    (sum / field.len().max(1) as f32, min, max)
}
