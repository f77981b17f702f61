//! Resolve the effective watch configuration from file and flags.

use crate::cli::Cli;
use anyhow::{Context, Result};
use linkwatch::{WatchBackend, WatchConfig};
use std::path::{Path, PathBuf};

/// Default config file location, if a config directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("linkwatch").join("config.toml"))
}

/// Load the config file named on the command line, or the default one when
/// present, then apply flag overrides.
pub fn load(cli: &Cli) -> Result<WatchConfig> {
    let config = match &cli.config {
        Some(path) => from_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => from_file(&path)?,
            _ => WatchConfig::default(),
        },
    };
    let config = apply_overrides(config, cli);
    config.validate().context("Invalid watch configuration")?;
    Ok(config)
}

fn from_file(path: &Path) -> Result<WatchConfig> {
    WatchConfig::load(path)
        .with_context(|| format!("Failed to load config file: {}", path.display()))
}

/// Apply command-line overrides on top of `config`.
pub fn apply_overrides(mut config: WatchConfig, cli: &Cli) -> WatchConfig {
    if cli.polling {
        config.backend = WatchBackend::Polling;
    }
    if let Some(interval) = cli.poll_interval_ms {
        config.poll_interval_ms = interval;
    }
    config
}
