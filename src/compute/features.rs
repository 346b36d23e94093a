//! Scalar descriptors of a grid snapshot.
//!
//! Renderers use these to pick hues and glyphs; the fitness evaluator uses
//! them to score patterns.

use serde::{Deserialize, Serialize};

use super::Grid;

/// Number of histogram bins used for the entropy estimate.
pub const HISTOGRAM_BINS: usize = 10;

/// Six descriptors, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Mirror similarity of field A across both axes.
    pub symmetry: f32,
    /// Mean absolute difference to right/bottom neighbours.
    pub complexity: f32,
    /// Mean of field A.
    pub density: f32,
    /// Mean absolute difference between fields A and B.
    pub dynamism: f32,
    /// Normalized Shannon entropy of field A's value histogram.
    pub entropy: f32,
    /// Similarity to the previous field-A snapshot (0 if none).
    pub temporal_coherence: f32,
}

impl FeatureVector {
    /// Extract features from a grid.
    ///
    /// `previous` is the field-A snapshot from before the last step. It is
    /// ignored when its length does not match the grid.
    pub fn extract(grid: &Grid, previous: Option<&[f32]>) -> Self {
        Self {
            symmetry: symmetry(grid),
            complexity: complexity(grid),
            density: mean(&grid.a),
            dynamism: dynamism(grid),
            entropy: entropy(&grid.a),
            temporal_coherence: previous
                .filter(|prev| prev.len() == grid.a.len())
                .map(|prev| temporal_coherence(&grid.a, prev))
                .unwrap_or(0.0),
        }
    }

    /// `entropy * dynamism`, used to bias archive ranking toward varied states.
    #[inline]
    pub fn diversity(&self) -> f32 {
        self.entropy * self.dynamism
    }

    /// Summed |difference| in symmetry, complexity and entropy.
    #[inline]
    pub fn shape_distance(&self, other: &FeatureVector) -> f32 {
        (self.symmetry - other.symmetry).abs()
            + (self.complexity - other.complexity).abs()
            + (self.entropy - other.entropy).abs()
    }

    /// Components in declaration order.
    pub fn as_array(&self) -> [f32; 6] {
        [
            self.symmetry,
            self.complexity,
            self.density,
            self.dynamism,
            self.entropy,
            self.temporal_coherence,
        ]
    }
}

#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

fn mean(field: &[f32]) -> f32 {
    if field.is_empty() {
        return 0.0;
    }
    unit(field.iter().sum::<f32>() / field.len() as f32)
}

/// Horizontal plus vertical mirror similarity over the left/top halves
/// (center row/column included for odd sizes), divided by the cell count.
fn symmetry(grid: &Grid) -> f32 {
    let w = grid.width;
    let h = grid.height;
    let mut total = 0.0f32;

    for y in 0..h {
        for x in 0..w.div_ceil(2) {
            let left = grid.a[y * w + x];
            let right = grid.a[y * w + (w - 1 - x)];
            total += 1.0 - (left - right).abs();
        }
    }
    for x in 0..w {
        for y in 0..h.div_ceil(2) {
            let top = grid.a[y * w + x];
            let bottom = grid.a[(h - 1 - y) * w + x];
            total += 1.0 - (top - bottom).abs();
        }
    }

    unit(total / grid.len() as f32)
}

fn complexity(grid: &Grid) -> f32 {
    let mut total = 0.0f32;
    for y in 0..grid.height as i64 {
        for x in 0..grid.width as i64 {
            let here = grid.a_at(x, y);
            total += (here - grid.a_at(x + 1, y)).abs();
            total += (here - grid.a_at(x, y + 1)).abs();
        }
    }
    unit(total / (grid.len() * 2) as f32)
}

fn dynamism(grid: &Grid) -> f32 {
    let total: f32 = grid
        .a
        .iter()
        .zip(grid.b.iter())
        .map(|(a, b)| (a - b).abs())
        .sum();
    unit(total / grid.len() as f32)
}

/// Histogram bin for a value: `floor(v * 9)`, capped to the last bin.
#[inline]
fn bin(v: f32) -> usize {
    let scaled = (v * (HISTOGRAM_BINS - 1) as f32).floor();
    if scaled.is_nan() || scaled < 0.0 {
        0
    } else {
        (scaled as usize).min(HISTOGRAM_BINS - 1)
    }
}

/// Shannon entropy of field values, normalized by `log2(10)`.
pub fn entropy(field: &[f32]) -> f32 {
    if field.is_empty() {
        return 0.0;
    }

    let mut histogram = [0usize; HISTOGRAM_BINS];
    for &v in field {
        histogram[bin(v)] += 1;
    }

    let total = field.len() as f32;
    let bits: f32 = histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f32 / total;
            -p * p.log2()
        })
        .sum();

    unit(bits / (HISTOGRAM_BINS as f32).log2())
}

fn temporal_coherence(current: &[f32], previous: &[f32]) -> f32 {
    if current.is_empty() {
        return 0.0;
    }
    let total: f32 = current
        .iter()
        .zip(previous.iter())
        .map(|(c, p)| 1.0 - (c - p).abs())
        .sum();
    unit(total / current.len() as f32)
}
