//! Batch Extraction
//!
//! Detection events are independent, so a batch is spread over the rayon
//! thread pool with one extraction per event.

use rayon::prelude::*;
use rustfft::num_complex::Complex64;
use tracing::info;

use crate::features::{CorrelationFeatures, FeatureExtractor};
use crate::FeatureError;

/// One detection event: a correlation and the peak found in it
#[derive(Debug, Clone, Copy)]
pub struct DetectionEvent<'a> {
    /// Complex correlation samples
    pub corr: &'a [Complex64],
    /// Peak index into `corr`
    pub lag: usize,
}

impl<'a> DetectionEvent<'a> {
    /// Create an event from a correlation and its peak index
    pub fn new(corr: &'a [Complex64], lag: usize) -> Self {
        Self { corr, lag }
    }
}

impl FeatureExtractor {
    /// Extract features for every event in parallel.
    ///
    /// Results keep the order of `events`; a failing event only affects its
    /// own slot.
    pub fn extract_batch(
        &self,
        events: &[DetectionEvent<'_>],
    ) -> Vec<Result<CorrelationFeatures, FeatureError>> {
        let results: Vec<_> = events
            .par_iter()
            .map(|event| self.extract(event.corr, event.lag))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(
            "Extracted batch: events={}, failed={}",
            events.len(),
            failed
        );
        results
    }
}
