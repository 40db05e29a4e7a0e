//! Stream descriptors
//!
//! Static per-entity metadata: endpoint templates, key properties,
//! replication settings, page-size caps, and the extra query parameters
//! each endpoint always receives. The registry order here is the order
//! streams sync in.

use crate::error::{Error, Result};
use crate::types::ReplicationMethod;

/// How a stream's records are enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// One fetch against a member-scoped endpoint
    TopLevel,
    /// One fetch per parent board
    Child,
    /// Per parent board, sub-paginated through descending date windows
    WindowedChild,
}

impl SyncMode {
    /// Whether this mode iterates parent boards
    pub fn is_child(self) -> bool {
        matches!(self, Self::Child | Self::WindowedChild)
    }

    /// Whether this mode uses date-window pagination
    pub fn is_windowed(self) -> bool {
        matches!(self, Self::WindowedChild)
    }
}

/// Record annotation applied before a record is yielded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Yield the record as fetched
    Identity,
    /// Attach the parent board's id under a synthetic `boardId` field
    AttachBoardId,
    /// Resolve custom-field items against the board's field definitions
    CustomFields,
}

/// Static descriptor for one entity type
#[derive(Debug, Clone, Copy)]
pub struct StreamDescriptor {
    /// Stable stream name
    pub id: &'static str,
    /// Endpoint path template with positional `{}` placeholders
    pub endpoint: &'static str,
    /// Fields forming the primary key
    pub key_properties: &'static [&'static str],
    /// Fields used for incremental cursoring; empty means full-table
    pub replication_keys: &'static [&'static str],
    /// Replication method advertised in the catalog
    pub replication_method: ReplicationMethod,
    /// Entity-specific response-size cap enforced by the API, if any
    pub max_page_size: Option<usize>,
    /// Static query parameters always sent (excluding `limit`)
    pub params: &'static [(&'static str, &'static str)],
    /// How records are enumerated
    pub sync_mode: SyncMode,
    /// Annotation applied to each record
    pub modifier: Modifier,
}

/// All known streams, in sync order
pub const STREAMS: &[StreamDescriptor] = &[
    StreamDescriptor {
        id: "boards",
        endpoint: "/members/{}/boards",
        key_properties: &["id"],
        replication_keys: &[],
        replication_method: ReplicationMethod::FullTable,
        max_page_size: None,
        params: &[],
        sync_mode: SyncMode::TopLevel,
        modifier: Modifier::Identity,
    },
    StreamDescriptor {
        id: "users",
        endpoint: "/boards/{}/members",
        key_properties: &["id", "boardId"],
        replication_keys: &[],
        replication_method: ReplicationMethod::FullTable,
        max_page_size: None,
        params: &[],
        sync_mode: SyncMode::Child,
        modifier: Modifier::AttachBoardId,
    },
    StreamDescriptor {
        id: "lists",
        endpoint: "/boards/{}/lists",
        key_properties: &["id"],
        replication_keys: &[],
        replication_method: ReplicationMethod::FullTable,
        max_page_size: None,
        params: &[],
        sync_mode: SyncMode::Child,
        modifier: Modifier::Identity,
    },
    StreamDescriptor {
        id: "actions",
        endpoint: "/boards/{}/actions",
        key_properties: &["id"],
        replication_keys: &["date"],
        replication_method: ReplicationMethod::Incremental,
        max_page_size: Some(1000),
        params: &[],
        sync_mode: SyncMode::WindowedChild,
        modifier: Modifier::Identity,
    },
    StreamDescriptor {
        id: "cards",
        endpoint: "/boards/{}/cards/all",
        key_properties: &["id"],
        replication_keys: &[],
        replication_method: ReplicationMethod::FullTable,
        max_page_size: Some(20000),
        params: &[("customFieldItems", "true")],
        sync_mode: SyncMode::Child,
        modifier: Modifier::CustomFields,
    },
    StreamDescriptor {
        id: "checklists",
        endpoint: "/boards/{}/checklists",
        key_properties: &["id"],
        replication_keys: &[],
        replication_method: ReplicationMethod::FullTable,
        max_page_size: None,
        params: &[("fields", "all"), ("checkItem_fields", "all")],
        sync_mode: SyncMode::Child,
        modifier: Modifier::Identity,
    },
];

/// All known streams, in sync order
pub fn all_streams() -> &'static [StreamDescriptor] {
    STREAMS
}

/// Look up a descriptor by stream id
pub fn lookup(stream_id: &str) -> Result<&'static StreamDescriptor> {
    STREAMS
        .iter()
        .find(|d| d.id == stream_id)
        .ok_or_else(|| Error::StreamNotFound {
            stream: stream_id.to_string(),
        })
}

/// Fill an endpoint template's positional `{}` placeholders
pub fn format_endpoint(template: &str, values: &[String]) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    let mut values = values.iter();

    while let Some(pos) = rest.find("{}") {
        result.push_str(&rest[..pos]);
        let value = values.next().ok_or_else(|| {
            Error::Other(format!(
                "endpoint template '{template}' has more placeholders than values"
            ))
        })?;
        result.push_str(value);
        rest = &rest[pos + 2..];
    }
    result.push_str(rest);
    Ok(result)
}
