//! Command-line front end for `linkwatch`.

pub mod cli;
pub mod config;
pub mod output;
