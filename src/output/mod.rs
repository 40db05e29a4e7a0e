//! Output module
//!
//! Serializes engine messages as JSON lines, one object per line:
//! `{"type": "RECORD", ...}` for records and `{"type": "STATE", ...}`
//! for state snapshots. A consumer persists the last STATE line it saw
//! and hands it back on the next run to resume.

mod writer;

pub use writer::JsonLinesWriter;
