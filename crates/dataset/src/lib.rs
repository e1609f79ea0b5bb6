//! Feature Dataset
//!
//! Loads the labelled feature table produced from detection events and
//! computes the summaries used when exploring it.

mod describe;
mod table;

pub use describe::{describe, ColumnSummary, Histogram, DEFAULT_HISTOGRAM_BINS};
pub use table::{Dataset, FEATURE_COLUMNS, LABEL_COLUMN};

use thiserror::Error;

/// Dataset errors
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
    #[error("Row {row}, column {column}: cannot parse {value:?} as a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}
