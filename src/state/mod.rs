//! State management and bookmarks
//!
//! # Overview
//!
//! The state module provides:
//! - `State` / `StreamBookmarks` - the persisted bookmark layout
//! - `BookmarkKey` - the named bookmark values a stream may hold
//! - `BookmarkStore` - durable get/set/clear with an explicit flush

mod store;
mod types;

pub use store::BookmarkStore;
pub use types::{BookmarkKey, State, StreamBookmarks};
