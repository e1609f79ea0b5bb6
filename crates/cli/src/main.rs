//! HT-STF Feature Tools - Main Entry Point

use clap::Parser;
use htstf_cli::{init_logging, run, Cli};
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    debug!("htstf v{}", env!("CARGO_PKG_VERSION"));
    let output = run(&cli)?;
    print!("{}", output);

    Ok(())
}
