//! Semantic watch events and the raw backend events they are derived from.

use crate::error::Error;
use chrono::{DateTime, Utc};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// A symlink-aware notification about a single watched path.
///
/// Every event carries the watched path exactly as the caller supplied it,
/// regardless of where that path currently resolves to.
#[derive(Debug)]
pub enum WatchEvent {
    /// The path exists and this is its full current content.
    Changed {
        /// The watched path.
        source: PathBuf,
        /// Content read from the watched path.
        data: Vec<u8>,
        /// When the event was produced.
        timestamp: DateTime<Utc>,
    },
    /// The path, or the target it resolved to, no longer exists.
    Removed {
        /// The watched path.
        source: PathBuf,
        /// When the event was produced.
        timestamp: DateTime<Utc>,
    },
    /// A non-fatal fault occurred while tracking the path.
    Error {
        /// The watched path.
        source: PathBuf,
        /// What went wrong.
        error: Error,
        /// When the event was produced.
        timestamp: DateTime<Utc>,
    },
}

impl WatchEvent {
    /// Create a change event carrying the content of `source`.
    pub fn changed(source: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        Self::Changed {
            source: source.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    /// Create a removal event.
    pub fn removed(source: impl Into<PathBuf>) -> Self {
        Self::Removed {
            source: source.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an error event.
    pub fn error(source: impl Into<PathBuf>, error: Error) -> Self {
        Self::Error {
            source: source.into(),
            error,
            timestamp: Utc::now(),
        }
    }

    /// The watched path this event is about.
    pub fn source(&self) -> &Path {
        match self {
            Self::Changed { source, .. }
            | Self::Removed { source, .. }
            | Self::Error { source, .. } => source,
        }
    }

    /// Content carried by a change event.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Self::Changed { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Reader over the event content. Empty for anything but a change event.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.data().unwrap_or_default())
    }

    /// The fault carried by an error event.
    pub fn as_error(&self) -> Option<&Error> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// When the event was produced.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Changed { timestamp, .. }
            | Self::Removed { timestamp, .. }
            | Self::Error { timestamp, .. } => *timestamp,
        }
    }

    /// The kind of this event.
    pub fn kind(&self) -> WatchEventKind {
        match self {
            Self::Changed { .. } => WatchEventKind::Changed,
            Self::Removed { .. } => WatchEventKind::Removed,
            Self::Error { .. } => WatchEventKind::Error,
        }
    }
}

/// Discriminant of [`WatchEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchEventKind {
    /// See [`WatchEvent::Changed`].
    Changed,
    /// See [`WatchEvent::Removed`].
    Removed,
    /// See [`WatchEvent::Error`].
    Error,
}

impl WatchEventKind {
    /// Get a string representation of the event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Changed => "changed",
            Self::Removed => "removed",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for WatchEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation reported by a notification backend for a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawOp {
    /// Entry was created (or something was renamed onto it).
    Create,
    /// Entry content was written.
    Write,
    /// Entry was removed.
    Remove,
    /// Entry was renamed away.
    Rename,
    /// Entry metadata changed.
    Chmod,
    /// Anything else the backend reports.
    Other,
}

impl RawOp {
    /// Whether this operation implies the entry has new content.
    pub fn affects_content(&self) -> bool {
        matches!(self, Self::Create | Self::Write)
    }
}

/// A low-level, symlink-blind notification about one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// What happened.
    pub op: RawOp,
    /// The path it happened to, as reported by the backend.
    pub path: PathBuf,
}

impl RawEvent {
    /// Create a new raw event.
    pub fn new(op: RawOp, path: impl Into<PathBuf>) -> Self {
        Self {
            op,
            path: path.into(),
        }
    }
}
