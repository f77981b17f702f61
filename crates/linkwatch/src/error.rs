//! Error types for the file watching system.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while establishing or running a watch session.
#[derive(Error, Debug)]
pub enum Error {
    /// Notification backend error (registration, removal, or backend fault).
    #[error("File watching error: {0}")]
    Watch(String),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resolving the watched path failed for a reason other than the path
    /// being absent.
    #[error("Failed to resolve '{}': {source}", path.display())]
    Resolve {
        /// The path that was being resolved.
        path: PathBuf,
        /// Underlying IO fault.
        #[source]
        source: std::io::Error,
    },

    /// Invalid path.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The watch session has already terminated.
    #[error("Watch session is closed")]
    SessionClosed,
}

/// Result type for file watching operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert notify errors to our error type.
impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err.to_string())
    }
}

/// Convert toml parse errors to our error type.
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
