//! Noise templates used to seed the activator field.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fraction of cells touched by [`NoiseTemplate::RandomDots`].
const DOT_FRACTION: f64 = 0.1;

/// Spatial template for a single noise pass over field B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NoiseTemplate {
    /// Disc of radius `min(width, height) / 4` around the grid center.
    Circle,
    /// Alternating columns of width `width / 8`.
    VerticalStripes,
    /// Alternating rows of height `height / 8`.
    HorizontalStripes,
    /// Blocks where both stripe conditions hold, side `min(width, height) / 8`.
    Grid,
    /// `floor(0.1 * width * height)` cells drawn with replacement.
    RandomDots,
}

impl NoiseTemplate {
    /// All templates, in declaration order.
    pub const ALL: [NoiseTemplate; 5] = [
        NoiseTemplate::Circle,
        NoiseTemplate::VerticalStripes,
        NoiseTemplate::HorizontalStripes,
        NoiseTemplate::Grid,
        NoiseTemplate::RandomDots,
    ];

    /// Pick a template uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Write fresh uniform values into `field` (row-major, `width * height`).
    ///
    /// Cells are visited in row-major order so a fixed random sequence gives
    /// a fixed result. Returns the number of assignments made; a stripe or
    /// block size of zero (dimension below 8) assigns nothing.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        field: &mut [f32],
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> usize {
        debug_assert_eq!(field.len(), width * height);

        match self {
            NoiseTemplate::Circle => {
                let cx = (width / 2) as f32;
                let cy = (height / 2) as f32;
                let radius = width.min(height) as f32 / 4.0;
                fill_where(field, width, height, rng, |x, y| {
                    let dx = x as f32 - cx;
                    let dy = y as f32 - cy;
                    (dx * dx + dy * dy).sqrt() < radius
                })
            }
            NoiseTemplate::VerticalStripes => {
                let band = width / 8;
                if band == 0 {
                    return 0;
                }
                fill_where(field, width, height, rng, |x, _| x % (band * 2) < band)
            }
            NoiseTemplate::HorizontalStripes => {
                let band = height / 8;
                if band == 0 {
                    return 0;
                }
                fill_where(field, width, height, rng, |_, y| y % (band * 2) < band)
            }
            NoiseTemplate::Grid => {
                let block = width.min(height) / 8;
                if block == 0 {
                    return 0;
                }
                fill_where(field, width, height, rng, |x, y| {
                    x % (block * 2) < block && y % (block * 2) < block
                })
            }
            NoiseTemplate::RandomDots => {
                let count = dot_count(width, height);
                for _ in 0..count {
                    let x = rng.gen_range(0..width);
                    let y = rng.gen_range(0..height);
                    field[y * width + x] = rng.r#gen::<f32>();
                }
                count
            }
        }
    }
}

/// Number of draws made by [`NoiseTemplate::RandomDots`].
#[inline]
pub fn dot_count(width: usize, height: usize) -> usize {
    ((width * height) as f64 * DOT_FRACTION).floor() as usize
}

fn fill_where<R, F>(field: &mut [f32], width: usize, height: usize, rng: &mut R, on: F) -> usize
where
    R: Rng + ?Sized,
    F: Fn(usize, usize) -> bool,
{
    let mut assigned = 0;
    for y in 0..height {
        for x in 0..width {
            if on(x, y) {
                field[y * width + x] = rng.r#gen::<f32>();
                assigned += 1;
            }
        }
    }
    assigned
}
