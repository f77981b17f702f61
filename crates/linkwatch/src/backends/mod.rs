//! Notification backends.

mod notify_backend;

pub use notify_backend::{raw_events_from_notify, NotifyBackend, RawEventReceiver};
