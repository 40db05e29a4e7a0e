//! Date-window pagination
//!
//! The actions feed filters on `since`/`before` but caps every response
//! and returns records newest-first with no cursor token, so the cursor
//! is synthesized client-side: whenever a response fills the cap, the
//! upper bound moves down to the oldest timestamp seen plus one
//! millisecond and the fetch repeats. Both bounds are exclusive
//! upstream; the millisecond epsilons at each seam (`-1ms` on the lower
//! bound of every fetch, `+1ms` on every resumed upper bound) convert
//! them to inclusive bounds so records sitting exactly on a boundary are
//! never lost. A boundary record may be fetched twice; duplicates are
//! acceptable, omissions are not.
//!
//! Two bookmark levels survive interruption: the macro window
//! (`window_start`/`window_end`, captured once per sync) and the
//! sub-window cursor (`sub_window_end`, rewritten after every full
//! page). `window_start` only advances when the whole window has been
//! drained for every parent.

use super::base::Stream;
use super::descriptor::format_endpoint;
use super::order::OrderValidator;
use super::RecordSink;
use crate::error::{Error, Result};
use crate::state::BookmarkKey;
use crate::types::{format_timestamp, parse_timestamp, record_timestamp};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// Observed response cap for unfiltered actions calls; the fallback
/// page size when a stream declares no cap of its own
const MAX_API_RESPONSE_SIZE: usize = 50;

/// Resolved window bounds for the current sync
#[derive(Debug)]
struct WindowBounds {
    start: DateTime<Utc>,
    sub_end: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
}

/// Initialize macro-window bookmarks at sync start.
///
/// `window_end` is captured here, once for the entire sync, so a
/// long-running sync has a stable upper bound instead of chasing "now"
/// from parent to parent. When a sub-window bookmark survives from an
/// interrupted run, the existing window is kept as-is and resumed.
pub(crate) async fn on_window_started(stream: &Stream) -> Result<()> {
    let store = stream.store();
    let id = stream.id();
    store.validate_stream(id).await?;

    if store.get(id, BookmarkKey::SubWindowEnd).await.is_none() {
        if store.get(id, BookmarkKey::WindowStart).await.is_none() {
            let start = stream.config().start_timestamp()?;
            store
                .set(id, BookmarkKey::WindowStart, format_timestamp(start))
                .await;
        }
        if store.get(id, BookmarkKey::WindowEnd).await.is_none() {
            let now = Utc::now();
            let end = match stream.config().end_timestamp()? {
                Some(configured) => configured.min(now),
                None => now,
            };
            store
                .set(id, BookmarkKey::WindowEnd, format_timestamp(end))
                .await;
        }
    }
    store.flush().await
}

/// Advance the durable window after every parent has been drained:
/// the next sync starts where this one ended.
pub(crate) async fn on_window_finished(stream: &Stream) -> Result<()> {
    let store = stream.store();
    let id = stream.id();

    let window_end = store
        .get(id, BookmarkKey::WindowEnd)
        .await
        .ok_or_else(|| Error::invalid_bookmarks(id, "window_end missing at window completion"))?;
    store.set(id, BookmarkKey::WindowStart, window_end).await;
    store.clear(id, BookmarkKey::WindowEnd).await;
    store.flush().await
}

/// Read and validate the window bookmarks, clamping to the configured
/// start/end dates
async fn window_bounds(stream: &Stream) -> Result<WindowBounds> {
    let store = stream.store();
    let id = stream.id();
    store.validate_stream(id).await?;

    let start_raw = store
        .get(id, BookmarkKey::WindowStart)
        .await
        .ok_or_else(|| Error::invalid_bookmarks(id, "window_start missing during sync"))?;
    let end_raw = store
        .get(id, BookmarkKey::WindowEnd)
        .await
        .ok_or_else(|| Error::invalid_bookmarks(id, "window_end missing during sync"))?;

    let configured_start = stream.config().start_timestamp()?;
    let configured_end = stream.config().end_timestamp()?;

    let start = parse_timestamp(&start_raw)?.max(configured_start);
    let mut end = parse_timestamp(&end_raw)?;
    if let Some(configured) = configured_end {
        end = end.min(configured);
    }

    let sub_end = match store.get(id, BookmarkKey::SubWindowEnd).await {
        Some(raw) => {
            let mut sub = parse_timestamp(&raw)?;
            if let Some(configured) = configured_end {
                sub = sub.min(configured);
            }
            Some(sub)
        }
        None => None,
    };

    Ok(WindowBounds {
        start,
        sub_end,
        end,
    })
}

/// Drain the current macro window for one parent, resuming from a
/// persisted sub-window cursor when one exists
pub(crate) async fn drain_window(
    stream: &Stream,
    parent_id: &str,
    sink: &mut dyn RecordSink,
) -> Result<()> {
    let bounds = window_bounds(stream).await?;
    // Upstream treats `since` as exclusive; back off one millisecond so
    // a record stamped exactly at window_start is included.
    let fetch_start = bounds.start - Duration::milliseconds(1);
    let upper = bounds.sub_end.unwrap_or(bounds.end);
    paginate_window(stream, parent_id, fetch_start, upper, sink).await
}

/// Repeatedly fetch `[since, before)` pages, walking `before` down the
/// feed until a short page signals the window is exhausted
async fn paginate_window(
    stream: &Stream,
    parent_id: &str,
    window_start: DateTime<Utc>,
    mut sub_window_end: DateTime<Utc>,
    sink: &mut dyn RecordSink,
) -> Result<()> {
    let store = stream.store();
    let id = stream.id();
    let endpoint = format_endpoint(stream.descriptor().endpoint, &[parent_id.to_string()])?;
    let page_cap = stream.page_size().unwrap_or(MAX_API_RESPONSE_SIZE);
    let sort_field = stream
        .descriptor()
        .replication_keys
        .first()
        .copied()
        .unwrap_or("date");

    // One validator spans the whole window scan, page seams included.
    let mut validator = OrderValidator::descending(id);

    loop {
        let mut params: Vec<(String, String)> = vec![
            ("since".to_string(), format_timestamp(window_start)),
            ("before".to_string(), format_timestamp(sub_window_end)),
            ("limit".to_string(), page_cap.to_string()),
        ];
        for (key, value) in stream.descriptor().params {
            params.push(((*key).to_string(), (*value).to_string()));
        }

        let records = stream.api().get_list(&endpoint, &params).await?;
        let batch_size = records.len();

        let mut oldest = None;
        for record in records {
            let ts = record_timestamp(&record, sort_field)?;
            // Checked before the record is yielded, so a violation stops
            // the sync without emitting anything past the bad record.
            validator.check(ts)?;
            oldest = Some(ts);
            sink.push(id, record)?;
        }

        if batch_size >= page_cap {
            let Some(oldest) = oldest else {
                break; // unreachable while page_cap > 0
            };
            info!(
                stream = id,
                parent_id,
                since = %format_timestamp(window_start),
                before = %format_timestamp(sub_window_end),
                "paginating within date window, max records received"
            );
            // Newest-first feed: a full page means older records remain.
            // Move the exclusive upper bound to just past the oldest
            // record seen so nothing sharing its timestamp is skipped.
            sub_window_end = oldest + Duration::milliseconds(1);
            store
                .set(id, BookmarkKey::SubWindowEnd, format_timestamp(sub_window_end))
                .await;
            store.flush().await?;
        } else {
            info!(
                stream = id,
                parent_id,
                since = %format_timestamp(window_start),
                before = %format_timestamp(sub_window_end),
                "finished syncing date window"
            );
            // Cleared in memory; the next parent advance or window
            // completion makes it durable.
            store.clear(id, BookmarkKey::SubWindowEnd).await;
            break;
        }
    }

    Ok(())
}
