//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{Cli, Commands};
use crate::config::TapConfig;
use crate::engine::SyncEngine;
use crate::error::{Error, Result};
use crate::http::{TrelloApi, TrelloClient};
use crate::output::JsonLinesWriter;
use crate::state::BookmarkStore;
use crate::streams::all_streams;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Discover => self.discover(),
            Commands::Read { streams } => self.read(streams.as_deref()).await,
            Commands::Streams => self.streams(),
        }
    }

    /// Load tap configuration from the file or inline JSON
    fn load_config(&self) -> Result<TapConfig> {
        if let Some(json) = &self.cli.config_json {
            return TapConfig::from_json(json);
        }
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config not specified (use --config or --config-json)"))?;
        TapConfig::from_file(path)
    }

    /// Open the bookmark store; file-backed when `--state` is given
    fn open_store(&self) -> Result<BookmarkStore> {
        match &self.cli.state {
            Some(path) => BookmarkStore::from_file(path),
            None => Ok(BookmarkStore::in_memory()),
        }
    }

    /// Verify credentials by resolving the authenticated member
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = TrelloClient::connect(&config).await?;
        let status = json!({
            "status": "ok",
            "member_id": client.member_id(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        Ok(())
    }

    /// Print the stream catalog
    fn discover(&self) -> Result<()> {
        let catalog = Catalog::discover();
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        Ok(())
    }

    /// Run a sync, streaming messages to stdout
    async fn read(&self, streams: Option<&str>) -> Result<()> {
        let config = Arc::new(self.load_config()?);
        let store = self.open_store()?;
        let client = TrelloClient::connect(&config).await?;

        let selection: Option<Vec<String>> = streams.map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect()
        });

        let mut engine = SyncEngine::new(Arc::new(client), config, store);
        let mut out = JsonLinesWriter::new(std::io::stdout().lock());
        let stats = engine.sync(selection.as_deref(), &mut out).await?;

        info!(
            records = stats.records_synced,
            streams = stats.streams_synced,
            duration_ms = stats.duration_ms,
            "sync complete"
        );
        Ok(())
    }

    /// List stream names without any metadata
    fn streams(&self) -> Result<()> {
        for descriptor in all_streams() {
            println!("{}", descriptor.id);
        }
        Ok(())
    }
}
