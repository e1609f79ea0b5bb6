//! Feature Vector Assembly

use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::window::{max_of, median_of, nan_max, safe_slice, WindowStats};
use crate::FeatureError;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 16;

/// Column names of the feature vector, in output order
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "peak",
    "psr",
    "pnr",
    "ratio_peak_to_median",
    "periodic_sum",
    "fwhm",
    "w_peak_period",
    "w_mean_period",
    "w_std_period",
    "w_energy_period",
    "sharpness_period",
    "w_peak_preamble",
    "w_mean_preamble",
    "w_std_preamble",
    "w_energy_preamble",
    "sharpness_preamble",
];

/// Added to every ratio denominator except sharpness
const RATIO_EPSILON: f64 = 1e-12;

/// Sidelobe level used when no sidelobe candidate exists
const SIDELOBE_FLOOR: f64 = 1e-12;

/// Shape features of one correlation peak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationFeatures {
    /// Magnitude at the peak index
    pub peak: f64,
    /// Peak-to-sidelobe ratio
    pub psr: f64,
    /// Peak-to-noise ratio against the median outside the guard region
    pub pnr: f64,
    /// Same value as `pnr`, kept as its own column
    pub ratio_peak_to_median: f64,
    /// Harmonic magnitudes at multiples of the period, relative to the peak
    pub periodic_sum: f64,
    /// Samples at or above half the peak around the peak
    pub fwhm: usize,
    /// Statistics of the smaller window (`*_period` columns)
    pub short_window: WindowStats,
    /// Statistics of the larger window (`*_preamble` columns)
    pub long_window: WindowStats,
}

impl CorrelationFeatures {
    /// Flat feature vector in [`FEATURE_NAMES`] order
    pub fn values(&self) -> [f64; FEATURE_DIMENSION] {
        let mut values = [0.0; FEATURE_DIMENSION];
        values[0] = self.peak;
        values[1] = self.psr;
        values[2] = self.pnr;
        values[3] = self.ratio_peak_to_median;
        values[4] = self.periodic_sum;
        values[5] = self.fwhm as f64;
        values[6..11].copy_from_slice(&self.short_window.values());
        values[11..16].copy_from_slice(&self.long_window.values());
        values
    }

    /// Feature values paired with their column names
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.values())
    }
}

/// Extractor for correlation shape features
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractorConfig,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            config: ExtractorConfig::default(),
        }
    }
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new(config: ExtractorConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        if config.windows_coincide() {
            warn!(
                "period equals preamble_len ({}), window statistics will repeat",
                config.period
            );
        }
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract features around the peak at `lag`.
    ///
    /// Fails with [`FeatureError::IndexOutOfRange`] if `lag` does not address
    /// a sample of `corr`. Every other degenerate window degrades to a numeric
    /// default.
    pub fn extract(
        &self,
        corr: &[Complex64],
        lag: usize,
    ) -> Result<CorrelationFeatures, FeatureError> {
        let len = corr.len();
        if lag >= len {
            return Err(FeatureError::IndexOutOfRange { lag, len });
        }

        let mag: Vec<f64> = corr.iter().map(|c| c.norm()).collect();
        let peak = mag[lag];

        // Windows reaching past the array are clipped anyway, so every size is
        // capped at the input length before signed arithmetic.
        let start = lag as isize;
        let guard = capped(self.config.guard(), len);
        let radius = capped(self.config.exclusion_radius(), len);

        let global_noise = noise_floor(&mag, start, guard);
        let pnr = peak / (global_noise + RATIO_EPSILON);

        let sidelobe_max = sidelobe_max(&mag, start, guard, radius);
        let psr = peak / (sidelobe_max + RATIO_EPSILON);

        let periodic_sum = self.periodic_sum(&mag, lag, peak);
        let fwhm = half_max_width(&mag, lag, peak);

        let [short_window, long_window] = self.config.window_sizes().map(|size| {
            WindowStats::compute(safe_slice(&mag, start, start + capped(size, len)))
        });

        debug!(
            "Extracted features: len={}, lag={}, peak={:.4}, psr={:.3}, pnr={:.3}, fwhm={}",
            len, lag, peak, psr, pnr, fwhm
        );

        Ok(CorrelationFeatures {
            peak,
            psr,
            pnr,
            ratio_peak_to_median: pnr,
            periodic_sum,
            fwhm,
            short_window,
            long_window,
        })
    }

    /// Sum of magnitudes at `lag ± k * period` relative to the peak
    fn periodic_sum(&self, mag: &[f64], lag: usize, peak: f64) -> f64 {
        let period = self.config.period;
        let len = mag.len();
        // an offset of len or more misses the array on both sides
        let harmonics: Vec<f64> = (1..=self.config.max_harmonic())
            .map_while(|k| k.checked_mul(period).filter(|&offset| offset < len))
            .flat_map(|offset| [lag.checked_sub(offset), lag.checked_add(offset)])
            .flatten()
            .filter_map(|idx| mag.get(idx).copied())
            .collect();

        if harmonics.is_empty() {
            return 0.0;
        }
        harmonics.iter().sum::<f64>() / (peak + RATIO_EPSILON)
    }
}

/// `size` as a signed offset, no larger than `len`
fn capped(size: usize, len: usize) -> isize {
    size.min(len) as isize
}

/// Median magnitude outside `[lag - guard, lag + guard)`, or of the whole
/// array when nothing lies outside.
fn noise_floor(mag: &[f64], lag: isize, guard: isize) -> f64 {
    let left = safe_slice(mag, 0, lag - guard);
    let right = safe_slice(mag, lag + guard, mag.len() as isize);

    if left.is_empty() && right.is_empty() {
        return median_of(mag);
    }
    let noise: Vec<f64> = left.iter().chain(right).copied().collect();
    median_of(&noise)
}

/// Strongest magnitude inside the guard region but outside the
/// exclusion radius.
fn sidelobe_max(mag: &[f64], lag: isize, guard: isize, radius: isize) -> f64 {
    let local = safe_slice(mag, lag - guard, lag + guard);
    if local.is_empty() {
        return SIDELOBE_FLOOR;
    }
    let left = safe_slice(mag, lag - guard, lag - radius);
    let right = safe_slice(mag, lag + radius, lag + guard);
    max_of(left)
        .into_iter()
        .chain(max_of(right))
        .reduce(nan_max)
        .unwrap_or(SIDELOBE_FLOOR)
}

/// Width of the run around `lag` with magnitude at or above half the peak.
///
/// The left walk stops at index 0 and the right walk at the array end, so a
/// flat array yields its full length.
fn half_max_width(mag: &[f64], lag: usize, peak: f64) -> usize {
    let half = 0.5 * peak;

    let mut left = lag;
    while left > 0 && mag[left] >= half {
        left -= 1;
    }

    let mut right = lag;
    while right < mag.len() && mag[right] >= half {
        right += 1;
    }

    right - left
}

/// Extract the flat feature vector in one call.
///
/// Equivalent to building a [`FeatureExtractor`] from the two window sizes
/// and taking [`CorrelationFeatures::values`].
pub fn extract_corr_features(
    corr: &[Complex64],
    lag: usize,
    preamble_len: usize,
    period: usize,
) -> Result<[f64; FEATURE_DIMENSION], FeatureError> {
    let extractor = FeatureExtractor::new(ExtractorConfig::new(preamble_len, period))?;
    extractor.extract(corr, lag).map(|features| features.values())
}
