//! Bookmark types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs. The
//! wire layout is `{"bookmarks": {"<stream_id>": {...}}}`. Absent keys
//! mean "never set", not null/zero; a stream with no keys at all has
//! never been synced and falls back to the configured start date.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The named bookmark values a stream may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkKey {
    /// Inclusive lower bound of the next macro window; advances
    /// monotonically when a window completes.
    WindowStart,
    /// Upper bound of the macro window currently being fetched
    WindowEnd,
    /// Upper bound of the current page-bounded sub-fetch; only ever
    /// present nested inside a macro window.
    SubWindowEnd,
    /// Parent entity currently being enumerated by a child stream
    ParentId,
}

impl BookmarkKey {
    /// The key name as persisted in state
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WindowStart => "window_start",
            Self::WindowEnd => "window_end",
            Self::SubWindowEnd => "sub_window_end",
            Self::ParentId => "parent_id",
        }
    }
}

/// Complete persisted state for the tap
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: HashMap<String, StreamBookmarks>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get bookmarks for a stream
    pub fn stream(&self, stream_id: &str) -> Option<&StreamBookmarks> {
        self.bookmarks.get(stream_id)
    }

    /// Get mutable bookmarks for a stream, creating if needed
    pub fn stream_mut(&mut self, stream_id: &str) -> &mut StreamBookmarks {
        self.bookmarks.entry(stream_id.to_string()).or_default()
    }

    /// Validate every stream's bookmarks
    ///
    /// Runs at load time so that hand-edited or corrupted state fails
    /// before any fetch is issued.
    pub fn validate(&self) -> Result<()> {
        for (stream_id, bookmarks) in &self.bookmarks {
            bookmarks.validate(stream_id)?;
        }
        Ok(())
    }
}

/// Bookmarks for a single stream
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamBookmarks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_end: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_window_end: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl StreamBookmarks {
    /// Create empty bookmarks
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a bookmark value by key
    pub fn get(&self, key: BookmarkKey) -> Option<&str> {
        self.field(key).as_deref()
    }

    /// Set a bookmark value
    pub fn set(&mut self, key: BookmarkKey, value: impl Into<String>) {
        *self.field_mut(key) = Some(value.into());
    }

    /// Clear a bookmark value
    pub fn clear(&mut self, key: BookmarkKey) {
        *self.field_mut(key) = None;
    }

    /// Whether no bookmark has ever been written
    pub fn is_empty(&self) -> bool {
        self.window_start.is_none()
            && self.window_end.is_none()
            && self.sub_window_end.is_none()
            && self.parent_id.is_none()
    }

    /// Enforce the nesting invariant: a sub-window can only exist inside
    /// a resumable macro window. There is no auto-repair; the operator
    /// clears state to recover.
    pub fn validate(&self, stream_id: &str) -> Result<()> {
        if self.sub_window_end.is_some() && self.window_end.is_none() {
            return Err(Error::invalid_bookmarks(
                stream_id,
                "sub_window_end is set without a governing window_end",
            ));
        }
        Ok(())
    }

    fn field(&self, key: BookmarkKey) -> &Option<String> {
        match key {
            BookmarkKey::WindowStart => &self.window_start,
            BookmarkKey::WindowEnd => &self.window_end,
            BookmarkKey::SubWindowEnd => &self.sub_window_end,
            BookmarkKey::ParentId => &self.parent_id,
        }
    }

    fn field_mut(&mut self, key: BookmarkKey) -> &mut Option<String> {
        match key {
            BookmarkKey::WindowStart => &mut self.window_start,
            BookmarkKey::WindowEnd => &mut self.window_end,
            BookmarkKey::SubWindowEnd => &mut self.sub_window_end,
            BookmarkKey::ParentId => &mut self.parent_id,
        }
    }
}
