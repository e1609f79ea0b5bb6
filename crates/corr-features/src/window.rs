//! Window Primitives and Statistics
//!
//! Every windowed measurement goes through [`safe_slice`], which turns a
//! window lying partly or entirely outside the array into a shorter or
//! empty slice instead of a panic.

use serde::{Deserialize, Serialize};

/// Added to the window spread before dividing in [`WindowStats::sharpness`]
pub const SHARPNESS_EPSILON: f64 = 1e-6;

/// Slice `values[start..end]` with both bounds clamped into `[0, len]`.
///
/// An inverted or fully out-of-range window yields an empty slice.
pub fn safe_slice(values: &[f64], start: isize, end: isize) -> &[f64] {
    let len = values.len() as isize;
    let start = start.clamp(0, len) as usize;
    let end = end.clamp(0, len) as usize;
    if start >= end {
        return &[];
    }
    &values[start..end]
}

/// Median of a slice; the two middle values are averaged for even lengths.
///
/// A NaN anywhere in the slice makes the median NaN.
pub fn median_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Larger of two values, NaN if either is NaN
pub fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Maximum of a slice, `None` when empty. NaN propagates.
pub fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(nan_max)
}

/// Statistics of one magnitude window starting at the peak
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Largest magnitude in the window
    pub peak: f64,
    /// Mean magnitude
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Sum of squared magnitudes
    pub energy: f64,
    /// Peak height above the mean in units of spread
    pub sharpness: f64,
}

impl WindowStats {
    /// Compute window statistics; an empty window yields all zeros.
    pub fn compute(window: &[f64]) -> Self {
        let Some(peak) = max_of(window) else {
            return Self::default();
        };

        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;

        let mut m2 = 0.0;
        let mut energy = 0.0;
        for &v in window {
            let d = v - mean;
            m2 += d * d;
            energy += v * v;
        }
        let std = (m2 / n).sqrt();

        let sharpness = (peak - mean) / (std + SHARPNESS_EPSILON);

        Self {
            peak,
            mean,
            std,
            energy,
            sharpness,
        }
    }

    /// The five statistics in output order
    pub fn values(&self) -> [f64; 5] {
        [self.peak, self.mean, self.std, self.energy, self.sharpness]
    }
}
