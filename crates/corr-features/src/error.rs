//! Feature Extraction Error Types

use thiserror::Error;

/// Errors during correlation feature extraction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// Peak index does not address a sample of the correlation
    #[error("Peak index {lag} is out of range for correlation of length {len}")]
    IndexOutOfRange { lag: usize, len: usize },

    /// Window configuration is unusable
    #[error("Invalid extractor config: {0}")]
    InvalidConfig(String),
}
