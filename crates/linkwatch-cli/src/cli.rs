//! Command-line arguments for the `linkwatch` binary.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "linkwatch")]
#[command(about = "Watch a single file path, following symlinks and atomic swaps")]
#[command(version)]
pub struct Cli {
    /// Path to watch (need not exist yet)
    pub path: PathBuf,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/linkwatch/config.toml)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Use the polling backend instead of native notifications
    #[arg(long)]
    pub polling: bool,

    /// Poll interval in milliseconds (implies nothing unless polling)
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Print file content with each change event
    #[arg(short = 'p', long)]
    pub print_content: bool,
}

impl Cli {
    /// Effective log level; `--log-level` wins over `--verbose`.
    pub fn level(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}
