//! Execution engine module
//!
//! Main sync loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Runs the selected streams in registry order
//! - `Message` / `MessageSink` - The record and state output protocol
//! - `SyncStats` - Counters for one sync run
//!
//! The engine emits a full state snapshot after every stream completes,
//! so a consumer that persists the latest state message can hand it back
//! on the next invocation and resume.

mod types;

pub use types::{CollectMessages, Message, MessageSink, SyncStats};

use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::http::TrelloApi;
use crate::state::BookmarkStore;
use crate::streams::{all_streams, RecordSink, Stream, StreamDescriptor};
use crate::types::Record;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Orchestrates a sync run over the stream registry
pub struct SyncEngine {
    /// Fetch capability
    api: Arc<dyn TrelloApi>,
    /// Tap configuration
    config: Arc<TapConfig>,
    /// Bookmark store shared by every stream
    store: BookmarkStore,
    /// Statistics
    stats: SyncStats,
}

/// Adapter from the per-stream record protocol onto the engine's
/// message protocol
struct EmitSink<'a> {
    sink: &'a mut dyn MessageSink,
    stats: &'a mut SyncStats,
}

impl RecordSink for EmitSink<'_> {
    fn push(&mut self, stream_id: &str, record: Record) -> Result<()> {
        self.stats.add_record();
        self.sink.emit(Message::record(stream_id, record))
    }
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(api: Arc<dyn TrelloApi>, config: Arc<TapConfig>, store: BookmarkStore) -> Self {
        Self {
            api,
            config,
            store,
            stats: SyncStats::new(),
        }
    }

    /// Get the bookmark store
    pub fn store(&self) -> &BookmarkStore {
        &self.store
    }

    /// Get the sync statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Run the sync over every selected stream, in registry order.
    ///
    /// `selection` of `None` syncs everything. An unknown stream name in
    /// the selection is fatal before any stream runs. A state message
    /// follows each completed stream.
    pub async fn sync(
        &mut self,
        selection: Option<&[String]>,
        sink: &mut dyn MessageSink,
    ) -> Result<&SyncStats> {
        let started = Instant::now();
        let descriptors = select_streams(selection)?;

        for descriptor in descriptors {
            info!(stream = descriptor.id, "syncing stream");
            let stream = Stream::new(
                descriptor,
                Arc::clone(&self.api),
                Arc::clone(&self.config),
                self.store.clone(),
            )?;

            {
                let mut emit = EmitSink {
                    sink: &mut *sink,
                    stats: &mut self.stats,
                };
                stream.sync(&mut emit).await?;
            }

            let state = self.store.to_json().await?;
            sink.emit(Message::state(state))?;
            self.stats.add_stream();
            info!(
                stream = descriptor.id,
                records = self.stats.records_synced,
                "stream complete"
            );
        }

        self.stats.set_duration(started.elapsed().as_millis() as u64);
        Ok(&self.stats)
    }
}

/// Resolve a stream selection against the registry, preserving registry
/// order regardless of the order names were given in
fn select_streams(selection: Option<&[String]>) -> Result<Vec<&'static StreamDescriptor>> {
    let Some(names) = selection else {
        return Ok(all_streams().iter().collect());
    };

    for name in names {
        if !all_streams().iter().any(|d| d.id == name.as_str()) {
            return Err(Error::StreamNotFound {
                stream: name.clone(),
            });
        }
    }
    Ok(all_streams()
        .iter()
        .filter(|d| names.iter().any(|n| n == d.id))
        .collect())
}
