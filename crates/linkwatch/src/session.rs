//! Watch sessions.
//!
//! A session tracks one logical path. It watches the directory containing the
//! path, since that is the only way to see the path being created or deleted,
//! and, while the path is a symlink pointing elsewhere, the path itself as
//! well, since directory watches do not report a symlink being re-pointed.
//! Raw backend events and snapshot requests are folded into a single task that
//! owns all session state.

use crate::{
    backends::{NotifyBackend, RawEventReceiver},
    config::WatchConfig,
    dispatcher::{DispatchRequest, Dispatcher},
    error::{Error, Result},
    events::{RawEvent, WatchEvent},
    resolver::{resolve, Resolution},
    traits::{NotificationBackend, WatchHandle},
    utils::clean,
};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Watch `path` with the OS-native backend.
///
/// Returns once the path's directory (and, for a symlink, the path itself) is
/// registered. Events are sent on `events` until `cancel` fires, after which
/// the session drops its sender.
///
/// No event is sent at start; call [`Dispatcher::request_snapshot`] to get
/// the current state.
pub async fn watch_file(
    cancel: CancellationToken,
    path: impl AsRef<Path>,
    events: mpsc::Sender<WatchEvent>,
) -> Result<Dispatcher> {
    watch_file_with_config(cancel, path, events, &WatchConfig::default()).await
}

/// Watch `path` with the backend selected by `config`.
pub async fn watch_file_with_config(
    cancel: CancellationToken,
    path: impl AsRef<Path>,
    events: mpsc::Sender<WatchEvent>,
    config: &WatchConfig,
) -> Result<Dispatcher> {
    config.validate()?;
    let (backend, raw_events) = NotifyBackend::from_config(config)?;
    watch_file_with_backend(cancel, path, events, backend, raw_events).await
}

/// Watch `path` over a caller-supplied backend whose raw events arrive on
/// `raw_events`.
pub async fn watch_file_with_backend<B>(
    cancel: CancellationToken,
    path: impl AsRef<Path>,
    events: mpsc::Sender<WatchEvent>,
    backend: B,
    raw_events: RawEventReceiver,
) -> Result<Dispatcher>
where
    B: NotificationBackend + 'static,
{
    let session = WatchSession::establish(path.as_ref(), backend, events, cancel.clone()).await?;
    let (dispatcher, requests) = Dispatcher::new(cancel);
    tokio::spawn(session.run(requests, raw_events));
    Ok(dispatcher)
}

struct WatchSession<B> {
    /// The path as the caller gave it; source of every event
    watched: PathBuf,
    /// Canonical directory joined with the entry name; what raw events are
    /// compared against
    entry: PathBuf,
    /// Where `watched` currently resolves
    target: Resolution,
    backend: B,
    dir_watch: WatchHandle,
    /// Direct registration on `entry` while it is a symlink pointing elsewhere
    link_watch: Option<WatchHandle>,
    events: mpsc::Sender<WatchEvent>,
    cancel: CancellationToken,
}

impl<B: NotificationBackend> WatchSession<B> {
    async fn establish(
        path: &Path,
        mut backend: B,
        events: mpsc::Sender<WatchEvent>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let located = clean(path);
        let name = located
            .file_name()
            .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?;
        let dir = match located.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let dir = tokio::fs::canonicalize(dir)
            .await
            .map_err(|source| Error::Resolve {
                path: dir.to_path_buf(),
                source,
            })?;
        let entry = dir.join(name);

        let dir_watch = backend.add_watch(&dir).await?;
        let mut session = Self {
            watched: path.to_path_buf(),
            entry,
            target: Resolution::Missing,
            backend,
            dir_watch,
            link_watch: None,
            events,
            cancel,
        };

        if let Err(err) = session.resolve_initial().await {
            session.release().await;
            return Err(err);
        }

        info!(
            "Watching {} (resolves to {:?})",
            session.watched.display(),
            session.target.target()
        );
        Ok(session)
    }

    async fn resolve_initial(&mut self) -> Result<()> {
        self.target = resolve(&self.watched).await?;
        if self.points_elsewhere() {
            self.link_watch = Some(self.backend.add_watch(&self.entry).await?);
        }
        Ok(())
    }

    async fn run(
        mut self,
        mut requests: mpsc::UnboundedReceiver<DispatchRequest>,
        mut raw_events: RawEventReceiver,
    ) {
        loop {
            let flow = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("Watch on {} cancelled", self.watched.display());
                    break;
                }
                Some(DispatchRequest) = requests.recv() => self.announce_current().await,
                raw = raw_events.recv() => match raw {
                    Some(Ok(raw)) => self.handle_raw_event(raw).await,
                    Some(Err(err)) => self.emit(WatchEvent::error(&self.watched, err)).await,
                    None => {
                        debug!("Raw event stream for {} ended", self.watched.display());
                        break;
                    }
                },
            };
            if flow.is_break() {
                break;
            }
        }

        self.release().await;
        info!("Stopped watching {}", self.watched.display());
    }

    /// Re-announce the current state without touching registrations.
    async fn announce_current(&mut self) -> ControlFlow<()> {
        if self.target.is_resolved() {
            self.announce_content().await
        } else {
            self.emit(WatchEvent::removed(&self.watched)).await
        }
    }

    async fn handle_raw_event(&mut self, raw: RawEvent) -> ControlFlow<()> {
        if clean(&raw.path) != self.entry {
            trace!("Ignoring {:?} on {}", raw.op, raw.path.display());
            return ControlFlow::Continue(());
        }

        let target = match resolve(&self.watched).await {
            Ok(Resolution::Resolved(target)) => target,
            Ok(Resolution::Missing) => {
                debug!("{} no longer resolves", self.watched.display());
                self.drop_link_watch().await;
                self.target = Resolution::Missing;
                return self.emit(WatchEvent::removed(&self.watched)).await;
            }
            Err(err) => return self.emit(WatchEvent::error(&self.watched, err)).await,
        };

        let retargeted = self.target.target() != Some(target.as_path());
        if retargeted {
            debug!(
                "{} now resolves to {}",
                self.watched.display(),
                target.display()
            );
            self.target = Resolution::Resolved(target);
            self.drop_link_watch().await;
            self.add_link_watch().await?;
        }

        if retargeted || raw.op.affects_content() {
            return self.announce_content().await;
        }
        ControlFlow::Continue(())
    }

    async fn announce_content(&mut self) -> ControlFlow<()> {
        let event = match tokio::fs::read(&self.watched).await {
            Ok(data) => WatchEvent::changed(&self.watched, data),
            Err(err) => WatchEvent::error(&self.watched, Error::Io(err)),
        };
        self.emit(event).await
    }

    /// Send an event, giving up if the session is cancelled while the
    /// consumer is not keeping up. Breaks when the consumer is gone.
    async fn emit(&mut self, event: WatchEvent) -> ControlFlow<()> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => ControlFlow::Break(()),
            sent = self.events.send(event) => match sent {
                Ok(()) => ControlFlow::Continue(()),
                Err(_) => {
                    debug!("Event receiver for {} dropped", self.watched.display());
                    ControlFlow::Break(())
                }
            },
        }
    }

    fn points_elsewhere(&self) -> bool {
        self.target
            .target()
            .is_some_and(|target| target != self.entry)
    }

    async fn add_link_watch(&mut self) -> ControlFlow<()> {
        if !self.points_elsewhere() {
            return ControlFlow::Continue(());
        }
        match self.backend.add_watch(&self.entry).await {
            Ok(handle) => {
                self.link_watch = Some(handle);
                ControlFlow::Continue(())
            }
            Err(err) => self.emit(WatchEvent::error(&self.watched, err)).await,
        }
    }

    async fn drop_link_watch(&mut self) {
        if let Some(handle) = self.link_watch.take() {
            // Fails routinely once the old target is gone
            if let Err(err) = self.backend.remove_watch(handle).await {
                debug!("Dropping direct watch on {}: {}", self.entry.display(), err);
            }
        }
    }

    async fn release(&mut self) {
        self.drop_link_watch().await;
        if let Err(err) = self.backend.remove_watch(self.dir_watch.clone()).await {
            warn!(
                "Failed to release directory watch {}: {}",
                self.dir_watch.path.display(),
                err
            );
        }
    }
}
