//! Command implementations
//!
//! Each command returns its stdout text so it can be checked in tests.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use corr_features::{
    Complex64, CorrelationFeatures, ExtractorConfig, FeatureExtractor, FEATURE_NAMES,
};
use dataset::{ColumnSummary, Dataset, Histogram, FEATURE_COLUMNS, LABEL_COLUMN};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ExtractArgs, OutputFormat};

/// Width of the longest histogram bar
const HISTOGRAM_BAR_WIDTH: usize = 50;

/// One complex correlation sample as stored on disk
#[derive(Debug, Clone, Copy, Deserialize)]
struct CorrSample {
    re: f64,
    im: f64,
}

/// Read correlation samples from CSV with `re` and `im` columns
pub fn load_correlation(path: &Path) -> Result<Vec<Complex64>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open correlation file {}", path.display()))?;

    let mut corr = Vec::new();
    for record in reader.deserialize() {
        let sample: CorrSample = record.context("Failed to read correlation sample")?;
        corr.push(Complex64::new(sample.re, sample.im));
    }
    Ok(corr)
}

/// Index of the sample with the largest magnitude
pub fn peak_index(corr: &[Complex64]) -> Option<usize> {
    corr.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
        .map(|(i, _)| i)
}

/// `extract` command
pub fn extract(args: &ExtractArgs, config: ExtractorConfig) -> Result<String> {
    let corr = load_correlation(&args.input)?;
    let lag = args.lag.or_else(|| peak_index(&corr)).unwrap_or(0);
    info!(
        "Extracting features: samples={}, lag={}, preamble_len={}, period={}",
        corr.len(),
        lag,
        config.preamble_len,
        config.period
    );

    let extractor = FeatureExtractor::new(config)?;
    let features = extractor.extract(&corr, lag)?;
    render_features(&features, args.format, args.label)
}

/// Format one feature vector
pub fn render_features(
    features: &CorrelationFeatures,
    format: OutputFormat,
    label: Option<f64>,
) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for (name, value) in features.named() {
                writeln!(out, "{:<22}{}", name, value)?;
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let object: serde_json::Map<String, serde_json::Value> = features
                .named()
                .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
                .collect();
            let mut out = serde_json::to_string_pretty(&object)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            let mut header: Vec<&str> = FEATURE_NAMES.to_vec();
            let mut row: Vec<String> = features.values().iter().map(f64::to_string).collect();
            if let Some(label) = label {
                header.push(LABEL_COLUMN);
                row.push(label.to_string());
            }
            writer.write_record(&header)?;
            writer.write_record(&row)?;
            let bytes = writer.into_inner().context("Failed to flush CSV output")?;
            Ok(String::from_utf8(bytes)?)
        }
    }
}

/// `summary` command
pub fn summary(path: &Path) -> Result<String> {
    let dataset = Dataset::load(path)
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;
    Ok(render_summary(&dataset))
}

/// Row count, feature count and positive count of a dataset
pub fn render_summary(dataset: &Dataset) -> String {
    format!(
        "Loaded {} samples with {} features. Positives: {}\n",
        dataset.len(),
        FEATURE_COLUMNS.len(),
        dataset.positives()
    )
}

/// Output of the `describe` command in JSON form
#[derive(Debug, Serialize)]
struct DescribeReport {
    rows: usize,
    positives: usize,
    head: Dataset,
    columns: Vec<ColumnSummary>,
    pnr_histogram: Histogram,
}

/// `describe` command
pub fn describe(path: &Path, bins: usize, head: usize, json: bool) -> Result<String> {
    let dataset = Dataset::load(path)
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;
    render_describe(&dataset, bins, head, json)
}

/// Leading rows, column statistics and PNR histogram of a dataset
pub fn render_describe(
    dataset: &Dataset,
    bins: usize,
    head: usize,
    json: bool,
) -> Result<String> {
    let head = dataset.head(head);
    let columns = dataset::describe(dataset);
    let pnr = dataset.column("pnr").unwrap_or_default();
    let pnr_histogram = Histogram::new(&pnr, bins);

    if json {
        let report = DescribeReport {
            rows: dataset.len(),
            positives: dataset.positives(),
            head,
            columns,
            pnr_histogram,
        };
        let mut out = serde_json::to_string_pretty(&report)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = render_summary(dataset);
    render_head(&mut out, &head)?;
    writeln!(
        out,
        "\n{:<22}{:>8}{:>14}{:>14}{:>14}{:>14}{:>14}{:>14}{:>14}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    )?;
    for s in &columns {
        writeln!(
            out,
            "{:<22}{:>8}{:>14.4}{:>14.4}{:>14.4}{:>14.4}{:>14.4}{:>14.4}{:>14.4}",
            s.name, s.count, s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max
        )?;
    }

    writeln!(out, "\nDistribution of PNR")?;
    let tallest = pnr_histogram.counts.iter().copied().max().unwrap_or(0).max(1);
    for (i, &count) in pnr_histogram.counts.iter().enumerate() {
        let bar = "#".repeat(count * HISTOGRAM_BAR_WIDTH / tallest);
        writeln!(
            out,
            "[{:>12.4}, {:>12.4}) {:>6} {}",
            pnr_histogram.edges[i],
            pnr_histogram.edges[i + 1],
            count,
            bar
        )?;
    }
    Ok(out)
}

/// First rows of the table, one line per row
fn render_head(out: &mut String, head: &Dataset) -> Result<()> {
    write!(out, "\n{:>5}{:>8}", "row", LABEL_COLUMN)?;
    for name in FEATURE_COLUMNS {
        write!(out, " {:>20}", name)?;
    }
    writeln!(out)?;
    for (i, (row, label)) in head.features.iter().zip(&head.labels).enumerate() {
        write!(out, "{:>5}{:>8}", i, label)?;
        for value in row {
            write!(out, " {:>20.4}", value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
