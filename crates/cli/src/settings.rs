//! Extractor settings
//!
//! Layered as: defaults, then an optional settings file, then `HTSTF_*`
//! environment variables, then command-line flags.

use std::path::Path;

use anyhow::Context;
use corr_features::ExtractorConfig;

/// Prefix of environment overrides, e.g. `HTSTF_PERIOD=80`
pub const ENV_PREFIX: &str = "HTSTF";

/// Load extractor settings from an optional file and the process environment
pub fn load(path: Option<&Path>) -> Result<ExtractorConfig, config::ConfigError> {
    load_from(path, None)
}

/// Load extractor settings with an explicit environment.
///
/// `env` replaces the process environment when given.
pub fn load_from(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<ExtractorConfig, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    settings.try_deserialize()
}

/// Apply command-line overrides on top of loaded settings
pub fn with_overrides(
    mut config: ExtractorConfig,
    preamble_len: Option<usize>,
    period: Option<usize>,
) -> ExtractorConfig {
    if let Some(preamble_len) = preamble_len {
        config.preamble_len = preamble_len;
    }
    if let Some(period) = period {
        config.period = period;
    }
    config
}

/// Load settings and apply command-line overrides
pub fn resolve(
    path: Option<&Path>,
    preamble_len: Option<usize>,
    period: Option<usize>,
) -> anyhow::Result<ExtractorConfig> {
    let config = load(path).context("Failed to load extractor settings")?;
    Ok(with_overrides(config, preamble_len, period))
}
