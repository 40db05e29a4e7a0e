//! Engine types
//!
//! Message types and statistics for the sync engine.

use crate::error::Result;
use crate::types::Record;
use serde_json::Value;

/// A message emitted during sync
#[derive(Debug, Clone)]
pub enum Message {
    /// One extracted record
    Record {
        /// Stream name
        stream: String,
        /// The record payload
        record: Record,
    },
    /// Full state snapshot, emitted after each stream completes
    State {
        /// The serialized bookmark state
        value: Value,
    },
}

impl Message {
    /// Create a record message
    pub fn record(stream: impl Into<String>, record: Record) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
        }
    }

    /// Create a state message
    pub fn state(value: Value) -> Self {
        Self::State { value }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }
}

/// Consumer of engine messages
pub trait MessageSink {
    /// Accept one message
    fn emit(&mut self, message: Message) -> Result<()>;
}

/// Sink that collects messages in memory; used by tests
#[derive(Debug, Default)]
pub struct CollectMessages {
    /// Messages in emission order
    pub messages: Vec<Message>,
}

impl CollectMessages {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records emitted for one stream, in order
    pub fn records_for(&self, stream_id: &str) -> Vec<&Record> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record { stream, record } if stream == stream_id => Some(record),
                _ => None,
            })
            .collect()
    }

    /// State snapshots, in emission order
    pub fn states(&self) -> Vec<&Value> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::State { value } => Some(value),
                _ => None,
            })
            .collect()
    }
}

impl MessageSink for CollectMessages {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.messages.push(message);
        Ok(())
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: usize,
    /// Total streams synced
    pub streams_synced: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record
    pub fn add_record(&mut self) {
        self.records_synced += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
