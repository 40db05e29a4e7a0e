//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Trello data-extraction tap
#[derive(Parser, Debug)]
#[command(name = "trello-tap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON); created on first run, rewritten as bookmarks
    /// advance
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test credentials against the API
    Check,

    /// Print the stream catalog
    Discover,

    /// Read data from streams, one JSON message per line on stdout
    Read {
        /// Streams to sync (comma-separated, empty = all)
        #[arg(long)]
        streams: Option<String>,
    },

    /// List available stream names (lightweight, no metadata)
    Streams,
}
