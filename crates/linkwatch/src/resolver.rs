//! Symlink resolution for watched paths.

use crate::error::{Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Where a watched path currently points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path exists and canonicalizes to this target.
    Resolved(PathBuf),
    /// The path, or the target of one of its symlinks, does not exist.
    Missing,
}

impl Resolution {
    /// The canonical target, if the path resolves.
    pub fn target(&self) -> Option<&Path> {
        match self {
            Self::Resolved(target) => Some(target),
            Self::Missing => None,
        }
    }

    /// Whether the path currently resolves.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Follow `path` through any symlinks to its canonical target.
///
/// A path that does not exist, including a dangling symlink, is
/// [`Resolution::Missing`] rather than an error.
pub async fn resolve(path: &Path) -> Result<Resolution> {
    match tokio::fs::canonicalize(path).await {
        Ok(target) => Ok(Resolution::Resolved(target)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Resolution::Missing),
        Err(source) => Err(Error::Resolve {
            path: path.to_path_buf(),
            source,
        }),
    }
}
