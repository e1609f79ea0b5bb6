//! Feature Table Loading

use std::fs::File;
use std::io::Read;
use std::path::Path;

use corr_features::{FEATURE_DIMENSION, FEATURE_NAMES};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::DatasetError;

/// Feature columns expected in the table, in vector order
pub const FEATURE_COLUMNS: [&str; FEATURE_DIMENSION] = FEATURE_NAMES;

/// Name of the label column
pub const LABEL_COLUMN: &str = "label";

/// Feature rows with their labels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// One feature vector per row, columns in [`FEATURE_COLUMNS`] order
    pub features: Vec<[f64; FEATURE_DIMENSION]>,
    /// Label of each row
    pub labels: Vec<f64>,
}

impl Dataset {
    /// Load a dataset from a CSV file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        info!("Loading dataset from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a dataset from CSV with a header row.
    ///
    /// Columns are matched by name, so their order is free and extra
    /// columns are ignored. Empty cells load as NaN.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();

        let mut feature_idx = [0usize; FEATURE_DIMENSION];
        for (slot, name) in feature_idx.iter_mut().zip(FEATURE_COLUMNS) {
            *slot = column_index(&headers, name)?;
        }
        let label_idx = column_index(&headers, LABEL_COLUMN)?;

        let mut dataset = Self::default();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let mut values = [0.0; FEATURE_DIMENSION];
            for ((value, &idx), name) in values.iter_mut().zip(&feature_idx).zip(FEATURE_COLUMNS) {
                *value = parse_cell(&record, idx, row, name)?;
            }
            dataset.features.push(values);
            dataset
                .labels
                .push(parse_cell(&record, label_idx, row, LABEL_COLUMN)?);
        }

        debug!("Loaded {} rows", dataset.len());
        Ok(dataset)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of rows labelled positive
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&label| label > 0.5).count()
    }

    /// The first `n` rows (fewer if the table is shorter)
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            features: self.features[..n].to_vec(),
            labels: self.labels[..n].to_vec(),
        }
    }

    /// All values of one feature column, `None` for an unknown name
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = FEATURE_COLUMNS.iter().position(|&c| c == name)?;
        Some(self.features.iter().map(|row| row[idx]).collect())
    }
}

fn column_index(headers: &StringRecord, name: &'static str) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or(DatasetError::MissingColumn(name))
}

fn parse_cell(
    record: &StringRecord,
    idx: usize,
    row: usize,
    column: &'static str,
) -> Result<f64, DatasetError> {
    let raw = record.get(idx).unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse().map_err(|_| DatasetError::InvalidNumber {
        row,
        column,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        let mut columns: Vec<&str> = FEATURE_COLUMNS.to_vec();
        columns.push(LABEL_COLUMN);
        columns.join(",")
    }

    fn row(base: f64, label: u8) -> String {
        let mut cells: Vec<String> = (0..FEATURE_DIMENSION)
            .map(|i| format!("{}", base + i as f64))
            .collect();
        cells.push(label.to_string());
        cells.join(",")
    }

    #[test]
    fn test_load_rows_and_labels() {
        let csv = format!("{}\n{}\n{}\n{}\n", header(), row(0.0, 1), row(10.0, 0), row(20.0, 1));
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.positives(), 2);
        assert_eq!(dataset.features[1][0], 10.0);
        assert_eq!(dataset.features[2][15], 35.0);
        assert_eq!(dataset.labels, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_columns_matched_by_name() {
        // label first, an extra column, features reversed
        let mut columns: Vec<&str> = vec![LABEL_COLUMN, "event_id"];
        columns.extend(FEATURE_COLUMNS.iter().rev());
        let mut cells = vec!["1".to_string(), "abc".to_string()];
        cells.extend((0..FEATURE_DIMENSION).rev().map(|i| i.to_string()));
        let csv = format!("{}\n{}\n", columns.join(","), cells.join(","));

        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let expected: Vec<f64> = (0..FEATURE_DIMENSION).map(|i| i as f64).collect();
        assert_eq!(dataset.features[0].to_vec(), expected);
        assert_eq!(dataset.column("pnr"), Some(vec![2.0]));
        assert_eq!(dataset.column("unknown"), None);
    }

    #[test]
    fn test_missing_column() {
        let csv = format!("{}\n", FEATURE_COLUMNS.join(","));
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn("label")));
    }

    #[test]
    fn test_invalid_number_reports_location() {
        let mut bad = row(0.0, 1);
        bad = bad.replacen("2", "x2", 1);
        let csv = format!("{}\n{}\n{}\n", header(), row(0.0, 0), bad);
        match Dataset::from_reader(csv.as_bytes()) {
            Err(DatasetError::InvalidNumber { row, column, value }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "pnr");
                assert_eq!(value, "x2");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_cell_is_nan() {
        let mut cells: Vec<String> = (0..FEATURE_DIMENSION).map(|i| i.to_string()).collect();
        cells[2] = String::new();
        cells.push("0".to_string());
        let csv = format!("{}\n{}\n", header(), cells.join(","));
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert!(dataset.features[0][2].is_nan());
    }

    #[test]
    fn test_head() {
        let csv = format!("{}\n{}\n{}\n{}\n", header(), row(0.0, 1), row(10.0, 0), row(20.0, 1));
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();

        let head = dataset.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head.features[1][0], 10.0);
        assert_eq!(head.labels, vec![1.0, 0.0]);
        assert_eq!(dataset.head(10), dataset);
        assert!(dataset.head(0).is_empty());
    }

    #[test]
    fn test_header_only() {
        let dataset = Dataset::from_reader(format!("{}\n", header()).as_bytes()).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.positives(), 0);
    }
}
