//! Common types and type aliases
//!
//! Shared scalars plus the timestamp helpers every other module leans on.
//! Trello's replication-key values (`date` on actions) carry millisecond
//! precision, and the date-window pagination epsilons are expressed in
//! milliseconds, so all formatting here is millisecond-exact.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A raw record as returned by the API: an opaque JSON object.
pub type Record = serde_json::Value;

/// How a stream is replicated to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationMethod {
    /// Every sync re-extracts the whole entity
    FullTable,
    /// Syncs advance a bookmark and only extract new activity
    Incremental,
}

impl ReplicationMethod {
    /// Singer-compatible string form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullTable => "FULL_TABLE",
            Self::Incremental => "INCREMENTAL",
        }
    }
}

/// Backoff strategy for HTTP retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Fixed delay between attempts
    Constant,
    /// Delay grows linearly with the attempt number
    Linear,
    /// Delay doubles each attempt
    Exponential,
}

// ============================================================================
// Timestamp helpers
// ============================================================================

/// Parse an ISO-8601 / RFC 3339 timestamp into UTC
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Accept a few laxer spellings for config values
    let formats = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    for fmt in formats {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(DateTime::from_naive_utc_and_offset(ndt, Utc));
        }
    }
    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = nd.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::from_naive_utc_and_offset(ndt, Utc));
        }
    }

    Err(Error::InvalidTimestamp {
        value: s.to_string(),
        message: "not a recognized ISO-8601 timestamp".to_string(),
    })
}

/// Format a timestamp with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Extract and parse a record's replication-key field
pub fn record_timestamp(record: &Record, field: &str) -> Result<DateTime<Utc>> {
    let raw = record
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::InvalidTimestamp {
            value: format!("<missing field '{field}'>"),
            message: "record has no string value for replication key".to_string(),
        })?;
    parse_timestamp(raw)
}

// ============================================================================
// Object-id creation time
// ============================================================================

/// Decode the creation time embedded in a Trello object id.
///
/// The first 8 hex characters of an id are the object's creation time in
/// seconds since the epoch. This is documented upstream and is the only
/// immutable ordering key available for parent resumption, since any
/// date field on the object itself can change.
pub fn creation_time_from_id(id: &str) -> Result<DateTime<Utc>> {
    let prefix = id.get(..8).ok_or_else(|| Error::InvalidObjectId {
        id: id.to_string(),
    })?;
    let secs = u32::from_str_radix(prefix, 16).map_err(|_| Error::InvalidObjectId {
        id: id.to_string(),
    })?;
    Utc.timestamp_opt(i64::from(secs), 0)
        .single()
        .ok_or_else(|| Error::InvalidObjectId {
            id: id.to_string(),
        })
}
