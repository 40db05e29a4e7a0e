//! Sort-order verification
//!
//! Date-window pagination assumes the activity feed is sorted strictly
//! descending by timestamp; the synthesized `before` cursor is derived
//! from the oldest record of each page. If the feed ever stops honoring
//! that order the cursor arithmetic silently loses data, so every
//! observed timestamp is checked and a violation is fatal.

use crate::error::{Error, Result};
use crate::types::format_timestamp;
use chrono::{DateTime, Utc};

/// Expected sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Each value must be >= the previous one
    Ascending,
    /// Each value must be <= the previous one
    Descending,
}

/// Checks that a sequence of timestamps honors a sort direction.
///
/// One validator covers one window scan: it is created fresh at the top
/// of the scan and carried across page boundaries, so an out-of-order
/// seam between two pages is caught as well. `reset` starts a new scope
/// explicitly; there is no implicit reset.
#[derive(Debug)]
pub struct OrderValidator {
    stream_id: String,
    direction: Direction,
    last_value: Option<DateTime<Utc>>,
}

impl OrderValidator {
    /// Create a validator expecting descending order
    pub fn descending(stream_id: impl Into<String>) -> Self {
        Self::new(stream_id, Direction::Descending)
    }

    /// Create a validator for the given direction
    pub fn new(stream_id: impl Into<String>, direction: Direction) -> Self {
        Self {
            stream_id: stream_id.into(),
            direction,
            last_value: None,
        }
    }

    /// Check the next observed value; equal neighbors are allowed
    pub fn check(&mut self, current: DateTime<Utc>) -> Result<()> {
        if let Some(last) = self.last_value {
            let violated = match self.direction {
                Direction::Ascending => current < last,
                Direction::Descending => current > last,
            };
            if violated {
                return Err(Error::OutOfOrder {
                    stream: self.stream_id.clone(),
                    current: format_timestamp(current),
                    previous: format_timestamp(last),
                });
            }
        }
        self.last_value = Some(current);
        Ok(())
    }

    /// Forget the last observed value, starting a new scope
    pub fn reset(&mut self) {
        self.last_value = None;
    }
}
