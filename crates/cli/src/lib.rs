//! HT-STF Feature Tools
//!
//! Command-line front-end for extracting correlation features and exploring
//! labelled feature tables.
//!
//! ```bash
//! htstf extract corr.csv --lag 412 --format json
//! htstf summary data/dataset.csv
//! htstf describe data/dataset.csv --bins 40
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub mod commands;
pub mod settings;

use dataset::DEFAULT_HISTOGRAM_BINS;

/// HT-STF correlation feature tools
#[derive(Parser, Debug)]
#[command(name = "htstf")]
#[command(author, version, about = "HT-STF correlation shape features")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Extractor settings file (values may be overridden by HTSTF_* variables)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the feature vector of one correlation
    Extract(ExtractArgs),

    /// Print row and positive counts of a feature table
    Summary {
        /// Feature table (CSV with feature columns and `label`)
        #[arg(default_value = "data/dataset.csv")]
        path: PathBuf,
    },

    /// Per-column statistics and the PNR distribution of a feature table
    Describe {
        /// Feature table (CSV with feature columns and `label`)
        #[arg(default_value = "data/dataset.csv")]
        path: PathBuf,

        /// Histogram bins for the PNR distribution
        #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
        bins: usize,

        /// Leading rows to preview
        #[arg(long, default_value_t = 5)]
        head: usize,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Correlation samples (CSV with `re` and `im` columns)
    pub input: PathBuf,

    /// Peak index (defaults to the sample of largest magnitude)
    #[arg(short, long)]
    pub lag: Option<usize>,

    /// Preamble length in samples
    #[arg(long)]
    pub preamble_len: Option<usize>,

    /// Repetition period in samples
    #[arg(long)]
    pub period: Option<usize>,

    /// Label appended to CSV output
    #[arg(long)]
    pub label: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for extracted features
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `name value` line per feature
    Text,
    /// JSON object keyed by feature name
    Json,
    /// Header and one row, loadable as a feature table
    Csv,
}

/// Initialize logging on stderr
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Execute the parsed command and return its output
pub fn run(cli: &Cli) -> anyhow::Result<String> {
    match &cli.command {
        Commands::Extract(args) => {
            let config = settings::resolve(cli.config.as_deref(), args.preamble_len, args.period)?;
            commands::extract(args, config)
        }
        Commands::Summary { path } => commands::summary(path),
        Commands::Describe {
            path,
            bins,
            head,
            json,
        } => commands::describe(path, *bins, *head, *json),
    }
}
