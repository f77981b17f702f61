//! Notify-based notification backend.

use crate::{
    config::{WatchBackend, WatchConfig},
    error::{Error, Result},
    events::{RawEvent, RawOp},
    traits::{NotificationBackend, WatchHandle},
};
use async_trait::async_trait;
use notify::event::{EventKind, MetadataKind, ModifyKind, RenameMode};
use notify::{PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Receiving side of a backend's raw event stream.
pub type RawEventReceiver = mpsc::UnboundedReceiver<Result<RawEvent>>;

/// Notification backend over a [`notify`] watcher.
///
/// Each instance owns one OS-level watcher, so dropping it releases every
/// registration it still holds.
pub struct NotifyBackend {
    /// Underlying watcher, native or polling
    watcher: Box<dyn Watcher + Send>,
    /// Which kind of watcher this is
    kind: WatchBackend,
    /// Active registrations
    watches: HashMap<Uuid, WatchHandle>,
}

impl std::fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyBackend")
            .field("kind", &self.kind)
            .field("watches", &self.watches)
            .finish_non_exhaustive()
    }
}

impl NotifyBackend {
    /// Create a backend using OS-native notifications.
    pub fn native() -> Result<(Self, RawEventReceiver)> {
        Self::from_config(&WatchConfig::default())
    }

    /// Create the backend selected by `config`.
    pub fn from_config(config: &WatchConfig) -> Result<(Self, RawEventReceiver)> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let backend = config.backend;
        let handler = move |result: notify::Result<notify::Event>| match result {
            Ok(event) => {
                for raw in raw_events_from_notify(event, backend) {
                    if sender.send(Ok(raw)).is_err() {
                        trace!("Raw event receiver dropped");
                        return;
                    }
                }
            }
            Err(err) => {
                let _ = sender.send(Err(Error::from(err)));
            }
        };

        let watcher: Box<dyn Watcher + Send> = match config.backend {
            WatchBackend::Native => Box::new(
                RecommendedWatcher::new(handler, notify::Config::default())
                    .map_err(|e| Error::Watch(format!("Failed to create notify watcher: {}", e)))?,
            ),
            WatchBackend::Polling => Box::new(
                PollWatcher::new(
                    handler,
                    notify::Config::default()
                        .with_poll_interval(config.poll_interval())
                        .with_compare_contents(true),
                )
                .map_err(|e| Error::Watch(format!("Failed to create poll watcher: {}", e)))?,
            ),
        };

        debug!("Created {} notify backend", config.backend.as_str());
        Ok((
            Self {
                watcher,
                kind: config.backend,
                watches: HashMap::new(),
            },
            receiver,
        ))
    }
}

#[async_trait]
impl NotificationBackend for NotifyBackend {
    fn backend_type(&self) -> &'static str {
        match self.kind {
            WatchBackend::Native => "notify",
            WatchBackend::Polling => "notify-poll",
        }
    }

    async fn add_watch(&mut self, path: &Path) -> Result<WatchHandle> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watch(format!("Failed to watch {}: {}", path.display(), e)))?;

        let handle = WatchHandle::new(path.to_path_buf());
        self.watches.insert(handle.id, handle.clone());
        info!("Added notify watch: {}", path.display());
        Ok(handle)
    }

    async fn remove_watch(&mut self, handle: WatchHandle) -> Result<()> {
        self.watches.remove(&handle.id);
        // Another registration for the same path keeps the OS watch alive
        if self.watches.values().any(|h| h.path == handle.path) {
            return Ok(());
        }

        self.watcher
            .unwatch(&handle.path)
            .map_err(|e| Error::Watch(format!("Failed to unwatch {}: {}", handle.path.display(), e)))?;
        info!("Removed notify watch: {}", handle.path.display());
        Ok(())
    }

    fn active_watches(&self) -> Vec<WatchHandle> {
        self.watches.values().cloned().collect()
    }
}

/// Convert a notify event into one raw event per affected path.
///
/// `backend` is the kind of watcher that produced the event. The poll
/// watcher reports a content write as a write-time change, so for it that
/// change counts as a write rather than a metadata touch.
pub fn raw_events_from_notify(event: notify::Event, backend: WatchBackend) -> Vec<RawEvent> {
    match event.kind {
        // A two-sided rename: the first path went away, the second appeared
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event
            .paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| {
                let op = if i == 0 { RawOp::Rename } else { RawOp::Create };
                RawEvent::new(op, path)
            })
            .collect(),
        kind => {
            let op = raw_op(&kind, backend);
            event
                .paths
                .into_iter()
                .map(|path| RawEvent::new(op, path))
                .collect()
        }
    }
}

fn raw_op(kind: &EventKind, backend: WatchBackend) -> RawOp {
    match kind {
        EventKind::Create(_) => RawOp::Create,
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime))
            if backend == WatchBackend::Polling =>
        {
            RawOp::Write
        }
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => RawOp::Write,
        EventKind::Modify(ModifyKind::Metadata(_)) => RawOp::Chmod,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => RawOp::Create,
        EventKind::Modify(ModifyKind::Name(_)) => RawOp::Rename,
        EventKind::Remove(_) => RawOp::Remove,
        _ => RawOp::Other,
    }
}
