//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `check` - Test credentials against the API
//! - `discover` - Print the stream catalog
//! - `read` - Extract data from streams
//! - `streams` - List stream names (lightweight)

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
