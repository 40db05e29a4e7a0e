//! Child-stream iteration
//!
//! Child streams enumerate their records once per parent board. The
//! iteration order is the parents' creation time decoded from their ids,
//! not the API's response order, so that the `parent_id` bookmark names
//! a stable position to resume from. The bookmarked parent itself is
//! re-fetched in full on resume: at-least-once, never missing records.

use super::base::Stream;
use super::descriptor;
use super::window;
use super::RecordSink;
use crate::error::{Error, Result};
use crate::state::BookmarkKey;
use crate::types::creation_time_from_id;
use std::sync::Arc;
use tracing::info;

/// Drive a full child-stream sync: parent discovery, resumption, and
/// per-parent extraction
pub(crate) async fn sync_child(stream: &Stream, sink: &mut dyn RecordSink) -> Result<()> {
    let windowed = stream.descriptor().sync_mode.is_windowed();
    if windowed {
        window::on_window_started(stream).await?;
    }

    let parent = Stream::new(
        descriptor::lookup("boards")?,
        Arc::clone(stream.api_arc()),
        Arc::clone(stream.config_arc()),
        stream.store().clone(),
    )?;
    let mut parent_ids = sort_parents_by_created(get_parent_ids(stream, &parent).await?)?;

    // Resume mid-parent-list if a bookmark survives from an interrupted
    // run. The bookmarked parent is reprocessed from its start.
    if let Some(bookmarked) = stream.store().get(stream.id(), BookmarkKey::ParentId).await {
        if let Some(pos) = parent_ids.iter().position(|p| *p == bookmarked) {
            info!(
                stream = stream.id(),
                parent_id = %bookmarked,
                skipped = pos,
                "resuming parent iteration from bookmark"
            );
            parent_ids.drain(..pos);
        }
    }

    for parent_id in &parent_ids {
        stream
            .store()
            .set(stream.id(), BookmarkKey::ParentId, parent_id)
            .await;
        stream.store().flush().await?;

        if windowed {
            window::drain_window(stream, parent_id, sink).await?;
        } else {
            let records = stream.get_records(&[parent_id.clone()], &[]).await?;
            for record in records {
                sink.push(stream.id(), record)?;
            }
        }
    }

    stream
        .store()
        .clear(stream.id(), BookmarkKey::ParentId)
        .await;
    if windowed {
        window::on_window_finished(stream).await?;
    } else {
        stream.store().flush().await?;
    }
    Ok(())
}

/// Fetch the ids of every parent board, requesting only the id field to
/// keep the payload small
async fn get_parent_ids(stream: &Stream, parent: &Stream) -> Result<Vec<String>> {
    info!(
        stream = stream.id(),
        parent = parent.id(),
        "retrieving ids of parent stream"
    );
    let records = parent
        .get_records(
            &parent.format_values(),
            &[("fields".to_string(), "id".to_string())],
        )
        .await?;

    records
        .iter()
        .map(|record| {
            record
                .get("id")
                .and_then(|v| v.as_str())
                .map(ToString::to_string)
                .ok_or_else(|| {
                    Error::unexpected_response(
                        parent.descriptor().endpoint,
                        "parent record has no 'id' field",
                    )
                })
        })
        .collect()
}

/// Sort parent ids ascending by the creation time embedded in the id
fn sort_parents_by_created(ids: Vec<String>) -> Result<Vec<String>> {
    let mut pairs = ids
        .into_iter()
        .map(|id| creation_time_from_id(&id).map(|created| (created, id)))
        .collect::<Result<Vec<_>>>()?;
    pairs.sort_by_key(|(created, _)| *created);
    Ok(pairs.into_iter().map(|(_, id)| id).collect())
}

#[cfg(test)]
mod child_tests {
    use super::*;

    #[test]
    fn test_sort_parents_by_created() {
        // Hex second prefixes: 0x65920080 < 0x65935200 < 0x6594a380
        let ids = vec![
            "6594a380cccccccccccccccc".to_string(),
            "65920080aaaaaaaaaaaaaaaa".to_string(),
            "65935200bbbbbbbbbbbbbbbb".to_string(),
        ];
        let sorted = sort_parents_by_created(ids).unwrap();
        assert_eq!(
            sorted,
            vec![
                "65920080aaaaaaaaaaaaaaaa".to_string(),
                "65935200bbbbbbbbbbbbbbbb".to_string(),
                "6594a380cccccccccccccccc".to_string(),
            ]
        );
    }

    #[test]
    fn test_sort_rejects_malformed_id() {
        let ids = vec!["not-hex!".to_string()];
        assert!(sort_parents_by_created(ids).is_err());
    }
}
