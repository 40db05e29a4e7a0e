//! Error types for the Trello tap
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Fatal extraction errors (`PageLimitExceeded`, `OutOfOrder`,
//! `InvalidBookmarks`, `UnexpectedResponse`) propagate to the top of the
//! sync call stack; nothing is swallowed. Bookmarks flushed before the
//! failure remain valid resume points.

use thiserror::Error;

/// The main error type for the tap
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Extraction Errors (fatal, non-retryable)
    // ============================================================================
    /// A flat-fetch stream returned as many records as the API will ever
    /// hand back in one response. Anything past the cap was silently
    /// dropped upstream, so the sync must abort rather than truncate.
    #[error(
        "{stream}: number of records returned is greater than or equal to \
         the max API response size of {limit}"
    )]
    PageLimitExceeded { stream: String, limit: usize },

    /// The descending sort-order assumption behind date-window pagination
    /// no longer holds upstream.
    #[error(
        "{stream}: detected out of order data. In descending sorted stream, \
         current sorted value {current} is greater than last sorted value {previous}"
    )]
    OutOfOrder {
        stream: String,
        current: String,
        previous: String,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    UnexpectedResponse { endpoint: String, message: String },

    #[error("Invalid timestamp '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },

    #[error("Cannot decode creation time from id '{id}'")]
    InvalidObjectId { id: String },

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    /// Bookmark state that can only arise from manual edits or a bug:
    /// a sub-window cursor with no governing macro window. The operator
    /// must clear state to recover.
    #[error("{stream}: inconsistent bookmarks: {message}")]
    InvalidBookmarks { stream: String, message: String },

    // ============================================================================
    // Catalog Errors
    // ============================================================================
    #[error("Stream '{stream}' not found in registry")]
    StreamNotFound { stream: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an unexpected-response error
    pub fn unexpected_response(
        endpoint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::UnexpectedResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create an inconsistent-bookmarks error
    pub fn invalid_bookmarks(
        stream: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidBookmarks {
            stream: stream.into(),
            message: message.into(),
        }
    }

    /// Check if this error is retryable at the HTTP layer
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the tap
pub type Result<T> = std::result::Result<T, Error>;
