//! # Linkwatch
//!
//! Change notification for a single logical file path, including paths that
//! are symlinks, paths that get atomically swapped (Kubernetes ConfigMap and
//! Secret mounts), and paths that do not exist yet.
//!
//! Raw filesystem notifications are directory-scoped, blind to symlink
//! identity and do not survive a file being deleted and recreated. A watch
//! session reconciles the watched path, its directory and, for a symlink, its
//! current target into one stream of semantic events:
//!
//! ```text
//! ┌──────────────┐  add/remove   ┌─────────────────┐
//! │ WatchSession │──────────────▶│  Notification   │
//! │  (one task)  │◀──────────────│    Backend      │
//! └──────────────┘   raw events  └─────────────────┘
//!     ▲       │
//!     │       ▼
//! ┌────────────┐ ┌───────────────────────────────┐
//! │ Dispatcher │ │ WatchEvent: Changed / Removed │
//! │ (snapshot) │ │             / Error           │
//! └────────────┘ └───────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkwatch::{watch_file, WatchEvent};
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> linkwatch::Result<()> {
//! let cancel = CancellationToken::new();
//! let (tx, mut rx) = mpsc::channel(64);
//! let dispatcher = watch_file(cancel.clone(), "/etc/app/config.yaml", tx).await?;
//! dispatcher.request_snapshot()?;
//!
//! while let Some(event) = rx.recv().await {
//!     match event {
//!         WatchEvent::Changed { data, .. } => println!("{} bytes", data.len()),
//!         WatchEvent::Removed { .. } => println!("gone"),
//!         WatchEvent::Error { error, .. } => eprintln!("{}", error),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod backends;
pub mod config;
mod dispatcher;
pub mod error;
mod events;
pub mod resolver;
mod session;
pub mod traits;
pub mod utils;

pub use backends::{NotifyBackend, RawEventReceiver};
pub use config::{WatchBackend, WatchConfig};
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use events::{RawEvent, RawOp, WatchEvent, WatchEventKind};
pub use resolver::{resolve, Resolution};
pub use session::{watch_file, watch_file_with_backend, watch_file_with_config};
pub use traits::{NotificationBackend, WatchHandle};
