//! Caller-facing handle to a running watch session.

use crate::error::{Error, Result};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Request for the session to announce its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DispatchRequest;

/// Handle returned when a watch session is established.
///
/// Cloning is cheap; all clones talk to the same session.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    trigger: mpsc::UnboundedSender<DispatchRequest>,
    cancel: CancellationToken,
}

impl Dispatcher {
    pub(crate) fn new(cancel: CancellationToken) -> (Self, mpsc::UnboundedReceiver<DispatchRequest>) {
        let (trigger, requests) = mpsc::unbounded_channel();
        (Self { trigger, cancel }, requests)
    }

    /// Ask the session to emit a `Changed` or `Removed` event reflecting the
    /// watched path right now.
    ///
    /// Never blocks; the event arrives on the session's event channel. Fails
    /// with [`Error::SessionClosed`] once the session has been cancelled or
    /// has exited.
    pub fn request_snapshot(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::SessionClosed);
        }
        self.trigger
            .send(DispatchRequest)
            .map_err(|_| Error::SessionClosed)
    }

    /// Cancel the session. Its registrations are released and its event
    /// channel closed by the session task.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether the session task has exited.
    pub fn is_closed(&self) -> bool {
        self.trigger.is_closed()
    }

    /// Wait until the session task has exited.
    pub async fn closed(&self) {
        self.trigger.closed().await
    }
}
