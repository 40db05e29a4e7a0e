//! Tap configuration
//!
//! The config is a JSON file in the usual Singer shape: credentials, a
//! required `start_date`, an optional `end_date` (deterministic testing),
//! and optional per-entity response-size overrides. Overrides accept an
//! integer or a numeric string; an empty string means "use the default",
//! which matches how operators actually edit these files.

use crate::error::{Error, Result};
use crate::types::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Parsed tap configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TapConfig {
    /// Trello API key
    pub api_key: String,
    /// Trello API token
    pub api_token: String,
    /// Global lower bound for the first sync of every stream (ISO-8601)
    pub start_date: String,
    /// Optional upper bound override, primarily for deterministic testing
    #[serde(default)]
    pub end_date: Option<String>,
    /// Override the API base URL (used by tests against a mock server)
    #[serde(default)]
    pub api_url: Option<String>,
    /// Override the page size for the cards stream
    #[serde(default)]
    pub cards_response_size: Option<Value>,
    /// Override the page size for the actions stream
    #[serde(default)]
    pub actions_response_size: Option<Value>,
}

impl TapConfig {
    /// Load and validate a config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Parse and validate a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values beyond what serde checks structurally
    pub fn validate(&self) -> Result<()> {
        if self.start_date.is_empty() {
            return Err(Error::missing_field("start_date"));
        }
        self.start_timestamp()?;
        if let Some(end) = &self.end_date {
            parse_timestamp(end).map_err(|e| Error::InvalidConfigValue {
                field: "end_date".to_string(),
                message: e.to_string(),
            })?;
        }
        // Surface bad overrides at load time instead of mid-sync
        self.response_size_override("cards_response_size", &self.cards_response_size)?;
        self.response_size_override("actions_response_size", &self.actions_response_size)?;
        Ok(())
    }

    /// The configured start date as a timestamp
    pub fn start_timestamp(&self) -> Result<DateTime<Utc>> {
        parse_timestamp(&self.start_date).map_err(|e| Error::InvalidConfigValue {
            field: "start_date".to_string(),
            message: e.to_string(),
        })
    }

    /// The configured end date as a timestamp, if any
    pub fn end_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        match &self.end_date {
            Some(end) => Ok(Some(parse_timestamp(end)?)),
            None => Ok(None),
        }
    }

    /// Effective page size for a stream: the config override if present,
    /// otherwise the descriptor default.
    pub fn page_size_for(&self, stream_id: &str, default: Option<usize>) -> Result<Option<usize>> {
        let raw = match stream_id {
            "cards" => &self.cards_response_size,
            "actions" => &self.actions_response_size,
            _ => &None,
        };
        let key = format!("{stream_id}_response_size");
        Ok(self.response_size_override(&key, raw)?.or(default))
    }

    fn response_size_override(&self, field: &str, raw: &Option<Value>) -> Result<Option<usize>> {
        let Some(value) = raw else { return Ok(None) };
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => {
                let size = n.as_u64().filter(|&n| n > 0).ok_or_else(|| {
                    Error::InvalidConfigValue {
                        field: field.to_string(),
                        message: format!("expected a positive integer, got {n}"),
                    }
                })?;
                Ok(Some(size as usize))
            }
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => {
                let size: usize = s.parse().map_err(|_| Error::InvalidConfigValue {
                    field: field.to_string(),
                    message: format!("expected a positive integer, got '{s}'"),
                })?;
                if size == 0 {
                    return Err(Error::InvalidConfigValue {
                        field: field.to_string(),
                        message: "expected a positive integer, got 0".to_string(),
                    });
                }
                Ok(Some(size))
            }
            other => Err(Error::InvalidConfigValue {
                field: field.to_string(),
                message: format!("expected an integer or numeric string, got {other}"),
            }),
        }
    }
}
