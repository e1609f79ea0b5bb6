//! Correlation Shape Features
//!
//! Derives a fixed-size feature vector describing the shape of an HT-STF
//! cross-correlation around a detected peak, for downstream classification
//! of preamble detection events.

mod batch;
mod config;
mod error;
mod features;
pub mod window;

pub use batch::DetectionEvent;
pub use config::ExtractorConfig;
pub use error::FeatureError;
pub use features::{
    extract_corr_features, CorrelationFeatures, FeatureExtractor, FEATURE_DIMENSION,
    FEATURE_NAMES,
};
pub use window::WindowStats;

pub use rustfft::num_complex::Complex64;
