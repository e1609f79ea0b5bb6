//! Descriptive Statistics
//!
//! Per-column summaries and histograms for exploring a loaded dataset.
//! NaN cells are skipped.

use serde::{Deserialize, Serialize};

use crate::table::{Dataset, FEATURE_COLUMNS};

/// Bin count used for the PNR distribution
pub const DEFAULT_HISTOGRAM_BINS: usize = 40;

/// Summary of one feature column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Non-NaN values
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1), 0 below two values
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Summarize a column; `None` if it holds no numbers
    pub fn compute(name: &str, values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let std = if sorted.len() >= 2 {
            let m2: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
            (m2 / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        Some(Self {
            name: name.to_string(),
            count: sorted.len(),
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Summaries of every feature column that holds numbers
pub fn describe(dataset: &Dataset) -> Vec<ColumnSummary> {
    FEATURE_COLUMNS
        .iter()
        .filter_map(|&name| {
            let values = dataset.column(name)?;
            ColumnSummary::compute(name, &values)
        })
        .collect()
}

/// Linear-interpolated quantile of sorted, non-empty values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins
    pub edges: Vec<f64>,
    /// Values per bin; the last bin includes its right edge
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` over their range.
    ///
    /// A constant column is binned over `[v - 0.5, v + 0.5]` and an empty one
    /// over `[0, 1]`.
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

        let (mut lo, mut hi) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if finite.is_empty() {
            lo = 0.0;
            hi = 1.0;
        } else if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for v in finite {
            let bin = (((v - lo) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        Self { edges, counts }
    }

    /// Total number of binned values
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corr_features::FEATURE_DIMENSION;
    use proptest::prelude::*;

    #[test]
    fn test_column_summary() {
        let summary = ColumnSummary::compute("psr", &[4.0, 1.0, 3.0, 2.0, f64::NAN]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 2.5);
        assert!((summary.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q25, 1.75);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.q75, 3.25);
        assert_eq!(summary.max, 4.0);
    }

    #[test]
    fn test_single_value_summary() {
        let summary = ColumnSummary::compute("fwhm", &[7.0]).unwrap();
        assert_eq!(summary.std, 0.0);
        assert_eq!(summary.median, 7.0);
        assert!(ColumnSummary::compute("fwhm", &[f64::NAN]).is_none());
    }

    #[test]
    fn test_describe_skips_empty_columns() {
        let mut row = [1.0; FEATURE_DIMENSION];
        row[4] = f64::NAN;
        let dataset = Dataset {
            features: vec![row, row],
            labels: vec![0.0, 1.0],
        };
        let summaries = describe(&dataset);
        assert_eq!(summaries.len(), FEATURE_DIMENSION - 1);
        assert!(summaries.iter().all(|s| s.name != "periodic_sum"));
        assert_eq!(summaries[0].name, "peak");
    }

    #[test]
    fn test_histogram_bins() {
        let values: Vec<f64> = (0..=10).map(|v| v as f64).collect();
        let hist = Histogram::new(&values, 5);
        assert_eq!(hist.edges, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        // the maximum lands in the last bin
        assert_eq!(hist.counts, vec![2, 2, 2, 2, 3]);
        assert_eq!(hist.total(), 11);
    }

    #[test]
    fn test_histogram_degenerate_ranges() {
        let constant = Histogram::new(&[3.0, 3.0, f64::NAN], 4);
        assert_eq!(constant.edges[0], 2.5);
        assert_eq!(constant.edges[4], 3.5);
        assert_eq!(constant.total(), 2);

        let empty = Histogram::new(&[], DEFAULT_HISTOGRAM_BINS);
        assert_eq!(empty.counts.len(), DEFAULT_HISTOGRAM_BINS);
        assert_eq!(empty.total(), 0);
    }

    proptest! {
        #[test]
        fn prop_histogram_counts_every_finite_value(
            values in proptest::collection::vec(-1e6f64..1e6, 0..200),
            bins in 1usize..64,
        ) {
            let hist = Histogram::new(&values, bins);
            prop_assert_eq!(hist.counts.len(), bins);
            prop_assert_eq!(hist.edges.len(), bins + 1);
            prop_assert_eq!(hist.total(), values.len());
        }
    }
}
