//! Extractor configuration

use serde::{Deserialize, Serialize};

use crate::FeatureError;

/// Minimum half-width of the region excluded around the peak for PSR
const MIN_EXCLUSION_RADIUS: usize = 8;

/// Window sizes driving every measurement of the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Duration of the known training pattern (samples)
    pub preamble_len: usize,

    /// Repetition period inside the training pattern (samples)
    pub period: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            preamble_len: 160,
            period: 80,
        }
    }
}

impl ExtractorConfig {
    /// Create a config with explicit sizes
    pub fn new(preamble_len: usize, period: usize) -> Self {
        Self {
            preamble_len,
            period,
        }
    }

    /// Check that both sizes are positive
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.preamble_len == 0 {
            return Err(FeatureError::InvalidConfig(
                "preamble_len must be positive".to_string(),
            ));
        }
        if self.period == 0 {
            return Err(FeatureError::InvalidConfig(
                "period must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Half-width of the local region around the peak
    pub fn guard(&self) -> usize {
        self.preamble_len
    }

    /// Half-width of the region treated as the peak itself when searching sidelobes
    pub fn exclusion_radius(&self) -> usize {
        MIN_EXCLUSION_RADIUS.max(self.period / 10)
    }

    /// Number of period multiples that fit inside the guard
    pub fn max_harmonic(&self) -> usize {
        self.guard().checked_div(self.period).unwrap_or(0)
    }

    /// Statistics window sizes, ascending.
    ///
    /// Both entries are equal when `period == preamble_len`; the window block
    /// is then emitted twice so the vector keeps its fixed length.
    pub fn window_sizes(&self) -> [usize; 2] {
        let small = self.period.min(self.preamble_len);
        let large = self.period.max(self.preamble_len);
        [small, large]
    }

    /// Whether the two window sizes collapse into one
    pub fn windows_coincide(&self) -> bool {
        self.period == self.preamble_len
    }
}
