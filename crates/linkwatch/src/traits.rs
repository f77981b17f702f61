//! Core traits for the file watching system.

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A raw notification backend.
///
/// Backends register individual paths (a directory, or a single entry) and
/// report raw events for them on a channel handed out when the backend is
/// created. They know nothing about symlink identity; that is layered on top
/// by the watch session.
#[async_trait]
pub trait NotificationBackend: Send {
    /// Get the backend type identifier.
    fn backend_type(&self) -> &'static str;

    /// Start watching `path` non-recursively.
    async fn add_watch(&mut self, path: &Path) -> Result<WatchHandle>;

    /// Stop watching the path behind `handle`.
    async fn remove_watch(&mut self, handle: WatchHandle) -> Result<()>;

    /// Get all active watches.
    fn active_watches(&self) -> Vec<WatchHandle>;
}

/// Handle to an active registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchHandle {
    /// Unique identifier for this registration.
    pub id: Uuid,

    /// Path being watched.
    pub path: PathBuf,
}

impl WatchHandle {
    /// Create a new watch handle.
    pub fn new(path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
        }
    }
}
