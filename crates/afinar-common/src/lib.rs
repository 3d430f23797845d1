//! Shared infrastructure for the afinar command line.
//!
//! This crate provides the pieces the `afinar` binary uses to talk to a user:
//! - Error handling with actionable diagnostics and stable error codes
//! - Output format selection
//! - Plain-text table rendering for terminal output

pub mod cli;
pub mod error;
pub mod output;

pub use cli::OutputFormat;
pub use error::{AfinarError, Result};
pub use output::{Table, TableBuilder};
