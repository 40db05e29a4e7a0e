//! Stream implementations
//!
//! # Overview
//!
//! The streams module provides:
//! - `StreamDescriptor` - static identity, endpoint, and replication
//!   metadata for each of the six entity types
//! - `Stream` - the record-producing protocol shared by every stream
//! - child-stream iteration with resumable parent cursors
//! - date-window pagination for the activity feed
//!
//! Replication behavior is a tagged `SyncMode` held by each descriptor
//! rather than an inheritance hierarchy: a stream is top-level or
//! per-parent, and a per-parent stream may additionally be date-windowed.

mod base;
mod child;
mod descriptor;
mod modify;
mod order;
mod window;

pub use base::Stream;
pub use descriptor::{
    all_streams, format_endpoint, lookup, Modifier, StreamDescriptor, SyncMode,
};
pub use modify::CustomFieldMaps;
pub use order::OrderValidator;

use crate::error::Result;
use crate::types::Record;

/// Consumer of extracted records
///
/// A sync pushes each record here as soon as it is produced; no buffering
/// happens across pages, so bookmark writes interleave with consumption
/// exactly as pagination advances.
pub trait RecordSink {
    /// Accept one record belonging to `stream_id`
    fn push(&mut self, stream_id: &str, record: Record) -> Result<()>;
}

/// Sink that collects records in memory; used by tests and embedders
#[derive(Debug, Default)]
pub struct CollectSink {
    /// Collected `(stream_id, record)` pairs, in yield order
    pub records: Vec<(String, Record)>,
}

impl CollectSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records belonging to one stream, in yield order
    pub fn for_stream(&self, stream_id: &str) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|(id, _)| id == stream_id)
            .map(|(_, r)| r)
            .collect()
    }
}

impl RecordSink for CollectSink {
    fn push(&mut self, stream_id: &str, record: Record) -> Result<()> {
        self.records.push((stream_id.to_string(), record));
        Ok(())
    }
}

#[cfg(test)]
mod tests;
