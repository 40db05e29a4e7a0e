//! JSON-lines message writer

use crate::engine::{Message, MessageSink};
use crate::error::Result;
use serde_json::json;
use std::io::Write;

/// Writes engine messages to any `Write` as JSON lines
///
/// Each line is flushed as it is written, so an observer tailing the
/// output sees records and state in real time and the last STATE line
/// is durable the moment it is emitted.
pub struct JsonLinesWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesWriter<W> {
    /// Wrap a writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Unwrap the inner writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, value: &serde_json::Value) -> Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> MessageSink for JsonLinesWriter<W> {
    fn emit(&mut self, message: Message) -> Result<()> {
        let line = match message {
            Message::Record { stream, record } => json!({
                "type": "RECORD",
                "stream": stream,
                "record": record,
            }),
            Message::State { value } => json!({
                "type": "STATE",
                "value": value,
            }),
        };
        self.write_line(&line)
    }
}
