//! Bookmark store implementation
//!
//! File-based persistence with atomic writes. Mutations happen in memory
//! and become durable only on `flush()`; the sync call sites flush after
//! every page, parent advance, and window completion so that an
//! interrupted process resumes with at most one parent's worth of rework.

use super::types::{BookmarkKey, State};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Durable store for per-stream bookmarks
#[derive(Debug)]
pub struct BookmarkStore {
    /// Path to the state file; empty for in-memory mode
    path: PathBuf,
    /// Current state (cached)
    state: Arc<RwLock<State>>,
}

impl BookmarkStore {
    /// Create an in-memory store (no file persistence); used by tests
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(State::new())),
        }
    }

    /// Create a store backed by a file, loading and validating existing
    /// state if the file is present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| Error::State {
                message: format!("Failed to read state file: {e}"),
            })?;
            let state: State = serde_json::from_str(&contents).map_err(|e| Error::State {
                message: format!("Failed to parse state file: {e}"),
            })?;
            state.validate()?;
            state
        } else {
            State::new()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Create a store from an inline JSON string (no file persistence)
    pub fn from_json(json: &str) -> Result<Self> {
        let state: State = serde_json::from_str(json).map_err(|e| Error::State {
            message: format!("Failed to parse state JSON: {e}"),
        })?;
        state.validate()?;

        Ok(Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Get a bookmark value
    pub async fn get(&self, stream_id: &str, key: BookmarkKey) -> Option<String> {
        let state = self.state.read().await;
        state
            .stream(stream_id)
            .and_then(|b| b.get(key))
            .map(ToString::to_string)
    }

    /// Set a bookmark value (in memory; call `flush` to persist)
    pub async fn set(&self, stream_id: &str, key: BookmarkKey, value: impl Into<String>) {
        let mut state = self.state.write().await;
        state.stream_mut(stream_id).set(key, value);
    }

    /// Clear a bookmark value (in memory; call `flush` to persist)
    pub async fn clear(&self, stream_id: &str, key: BookmarkKey) {
        let mut state = self.state.write().await;
        state.stream_mut(stream_id).clear(key);
    }

    /// Validate the bookmarks of one stream against the nesting invariant
    pub async fn validate_stream(&self, stream_id: &str) -> Result<()> {
        let state = self.state.read().await;
        match state.stream(stream_id) {
            Some(bookmarks) => bookmarks.validate(stream_id),
            None => Ok(()),
        }
    }

    /// Flush the current state to durable storage
    ///
    /// Writes to a temp file and renames for atomicity, so a crash during
    /// flush never leaves a half-written state file behind.
    pub async fn flush(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(()); // In-memory mode
        }

        let contents = {
            let state = self.state.read().await;
            serde_json::to_string_pretty(&*state).map_err(|e| Error::State {
                message: format!("Failed to serialize state: {e}"),
            })?
        };

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to write state file: {e}"),
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to rename state file: {e}"),
            })?;

        Ok(())
    }

    /// Snapshot the current state
    pub async fn snapshot(&self) -> State {
        self.state.read().await.clone()
    }

    /// Export state as a JSON value
    pub async fn to_json(&self) -> Result<serde_json::Value> {
        let state = self.state.read().await;
        serde_json::to_value(&*state).map_err(|e| Error::State {
            message: format!("Failed to serialize state: {e}"),
        })
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

impl Clone for BookmarkStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            state: Arc::clone(&self.state),
        }
    }
}
