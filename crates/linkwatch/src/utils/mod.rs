//! Utility functions for the file watching system.

pub mod path;

pub use path::clean;
