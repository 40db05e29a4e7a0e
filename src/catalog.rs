//! Stream catalog
//!
//! Discovery output: the streams the tap knows about and their
//! replication metadata, derived entirely from the static registry.

use crate::streams::all_streams;
use serde::{Deserialize, Serialize};

/// The discoverable catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// One entry per known stream
    pub streams: Vec<CatalogEntry>,
}

/// Catalog metadata for one stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream name
    pub stream: String,
    /// Stable stream identifier
    pub tap_stream_id: String,
    /// Primary key fields
    pub key_properties: Vec<String>,
    /// Incremental cursor fields; empty for full-table streams
    pub replication_keys: Vec<String>,
    /// `FULL_TABLE` or `INCREMENTAL`
    pub replication_method: String,
}

impl Catalog {
    /// Build the catalog from the stream registry
    pub fn discover() -> Self {
        let streams = all_streams()
            .iter()
            .map(|descriptor| CatalogEntry {
                stream: descriptor.id.to_string(),
                tap_stream_id: descriptor.id.to_string(),
                key_properties: descriptor
                    .key_properties
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                replication_keys: descriptor
                    .replication_keys
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                replication_method: descriptor.replication_method.as_str().to_string(),
            })
            .collect();
        Self { streams }
    }

    /// Names of every stream in the catalog
    pub fn stream_names(&self) -> Vec<&str> {
        self.streams.iter().map(|e| e.stream.as_str()).collect()
    }
}
