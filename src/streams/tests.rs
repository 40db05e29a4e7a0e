//! Tests for the streams module
//!
//! Streams are exercised against in-process `TrelloApi` implementations:
//! `ScriptedApi` replays canned responses per endpoint, while
//! `ActionsFeedApi` models the real actions feed (descending order,
//! exclusive `since`/`before` bounds, response cap) so the window
//! pagination is tested against the semantics it was written for.

use super::*;
use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::http::TrelloApi;
use crate::state::{BookmarkKey, BookmarkStore};
use crate::types::{format_timestamp, parse_timestamp, Record};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// Board ids with hex creation-time prefixes:
//   0x65920080 = 2024-01-01T00:00:00Z
//   0x65935200 = 2024-01-02T00:00:00Z
//   0x6594a380 = 2024-01-03T00:00:00Z
const BOARD_JAN_1: &str = "659200800000000000000001";
const BOARD_JAN_2: &str = "659352000000000000000002";
const BOARD_JAN_3: &str = "6594a3800000000000000003";

fn tap_config(extra: &str) -> Arc<TapConfig> {
    let comma = if extra.is_empty() { "" } else { "," };
    let json = format!(
        r#"{{"api_key": "k", "api_token": "t",
             "start_date": "2024-01-01T00:00:00Z"{comma}{extra}}}"#
    );
    Arc::new(TapConfig::from_json(&json).unwrap())
}

fn make_stream(
    id: &str,
    api: Arc<dyn TrelloApi>,
    config: Arc<TapConfig>,
    store: BookmarkStore,
) -> Stream {
    Stream::new(lookup(id).unwrap(), api, config, store).unwrap()
}

fn board_record(id: &str) -> Value {
    json!({ "id": id })
}

fn action(id: &str, date: &str) -> Value {
    json!({ "id": id, "date": date })
}

// ============================================================================
// ScriptedApi: canned responses per endpoint
// ============================================================================

struct ScriptedApi {
    member_id: String,
    responses: Mutex<HashMap<String, Vec<Vec<Value>>>>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedApi {
    fn new() -> Self {
        Self {
            member_id: "member-1".to_string(),
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response for an endpoint; the last queued response is
    /// sticky and replays for any further calls
    fn respond(self: &Arc<Self>, endpoint: &str, records: Vec<Value>) {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push(records);
    }

    fn calls_to(&self, endpoint: &str) -> Vec<Vec<(String, String)>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == endpoint)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl TrelloApi for ScriptedApi {
    fn member_id(&self) -> &str {
        &self.member_id
    }

    async fn get_list(&self, endpoint: &str, params: &[(String, String)]) -> Result<Vec<Value>> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), params.to_vec()));
        let mut responses = self.responses.lock().unwrap();
        let queue = responses
            .get_mut(endpoint)
            .ok_or_else(|| Error::Other(format!("unscripted endpoint: {endpoint}")))?;
        if queue.len() > 1 {
            Ok(queue.remove(0))
        } else {
            Ok(queue[0].clone())
        }
    }
}

// ============================================================================
// ActionsFeedApi: a faithful model of the actions feed
// ============================================================================

struct ActionsFeedApi {
    member_id: String,
    boards: Vec<Value>,
    /// Per-board actions, any order; served filtered and newest-first
    actions: HashMap<String, Vec<Value>>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ActionsFeedApi {
    fn new(boards: Vec<&str>, actions: HashMap<String, Vec<Value>>) -> Self {
        Self {
            member_id: "member-1".to_string(),
            boards: boards.iter().map(|id| board_record(id)).collect(),
            actions,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn action_calls(&self, board_id: &str) -> Vec<Vec<(String, String)>> {
        let endpoint = format!("/boards/{board_id}/actions");
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[async_trait]
impl TrelloApi for ActionsFeedApi {
    fn member_id(&self) -> &str {
        &self.member_id
    }

    async fn get_list(&self, endpoint: &str, params: &[(String, String)]) -> Result<Vec<Value>> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), params.to_vec()));

        if endpoint.ends_with("/boards") {
            return Ok(self.boards.clone());
        }

        let board_id = endpoint
            .strip_prefix("/boards/")
            .and_then(|rest| rest.strip_suffix("/actions"))
            .ok_or_else(|| Error::Other(format!("unexpected endpoint: {endpoint}")))?;

        let since = param(params, "since").map(parse_timestamp).transpose()?;
        let before = param(params, "before").map(parse_timestamp).transpose()?;
        let limit: usize = param(params, "limit")
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        // Both bounds exclusive, newest first, capped at `limit`
        let mut matching: Vec<(DateTime<Utc>, Value)> = self
            .actions
            .get(board_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|a| {
                let ts = parse_timestamp(a["date"].as_str().unwrap()).unwrap();
                (ts, a.clone())
            })
            .filter(|(ts, _)| since.map_or(true, |s| *ts > s) && before.map_or(true, |b| *ts < b))
            .collect();
        matching.sort_by_key(|(ts, _)| std::cmp::Reverse(*ts));
        matching.truncate(limit);
        Ok(matching.into_iter().map(|(_, a)| a).collect())
    }
}

// ============================================================================
// Sink that fails partway through, simulating an interrupted process
// ============================================================================

struct FailingSink {
    inner: CollectSink,
    remaining: usize,
}

impl FailingSink {
    fn after(remaining: usize) -> Self {
        Self {
            inner: CollectSink::new(),
            remaining,
        }
    }
}

impl RecordSink for FailingSink {
    fn push(&mut self, stream_id: &str, record: Record) -> Result<()> {
        if self.remaining == 0 {
            return Err(Error::Other("interrupted".to_string()));
        }
        self.remaining -= 1;
        self.inner.push(stream_id, record)
    }
}

// ============================================================================
// Base stream
// ============================================================================

#[tokio::test]
async fn test_top_level_stream_syncs_member_boards() {
    let api = Arc::new(ScriptedApi::new());
    api.respond(
        "/members/member-1/boards",
        vec![board_record(BOARD_JAN_1), board_record(BOARD_JAN_2)],
    );

    let stream = make_stream("boards", api.clone(), tap_config(""), BookmarkStore::in_memory());
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();

    let boards = sink.for_stream("boards");
    assert_eq!(boards.len(), 2);
    assert_eq!(boards[0]["id"], BOARD_JAN_1);

    // Boards carry no response cap, so no limit param is sent
    let calls = api.calls_to("/members/member-1/boards");
    assert_eq!(calls.len(), 1);
    assert!(param(&calls[0], "limit").is_none());
}

#[tokio::test]
async fn test_flat_pagination_guard_fails_fast() {
    // A capped stream returning exactly the cap means silent truncation
    // upstream: the sync must fail before yielding anything.
    let api = Arc::new(ScriptedApi::new());
    api.respond("/members/member-1/boards", vec![board_record(BOARD_JAN_1)]);
    api.respond(&format!("/boards/{BOARD_JAN_1}/customFields"), vec![]);
    api.respond(
        &format!("/boards/{BOARD_JAN_1}/cards/all"),
        vec![json!({"id": "c1"}), json!({"id": "c2"})],
    );

    let config = tap_config(r#""cards_response_size": 2"#);
    let stream = make_stream("cards", api, config, BookmarkStore::in_memory());
    let mut sink = CollectSink::new();
    let err = stream.sync(&mut sink).await.unwrap_err();

    assert!(matches!(err, Error::PageLimitExceeded { limit: 2, .. }));
    assert!(sink.for_stream("cards").is_empty());
}

#[tokio::test]
async fn test_cards_below_cap_pass_with_custom_fields() {
    let api = Arc::new(ScriptedApi::new());
    api.respond("/members/member-1/boards", vec![board_record(BOARD_JAN_1)]);
    api.respond(
        &format!("/boards/{BOARD_JAN_1}/customFields"),
        vec![json!({
            "id": "f1", "name": "Priority", "type": "list",
            "options": [
                {"id": "o1", "idCustomField": "f1", "value": {"text": "High"}}
            ]
        })],
    );
    api.respond(
        &format!("/boards/{BOARD_JAN_1}/cards/all"),
        vec![json!({
            "id": "c1",
            "customFieldItems": [{"idCustomField": "f1", "idValue": "o1"}]
        })],
    );

    let stream = make_stream("cards", api.clone(), tap_config(""), BookmarkStore::in_memory());
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();

    let cards = sink.for_stream("cards");
    assert_eq!(cards.len(), 1);
    let item = &cards[0]["customFieldItems"][0];
    assert_eq!(item["name"], "Priority");
    assert_eq!(item["value"], json!({"option": "High"}));

    // Cards always request custom field items and the default cap
    let calls = api.calls_to(&format!("/boards/{BOARD_JAN_1}/cards/all"));
    assert_eq!(param(&calls[0], "customFieldItems"), Some("true"));
    assert_eq!(param(&calls[0], "limit"), Some("20000"));
}

// ============================================================================
// Child streams: ordering and resumption
// ============================================================================

fn users_api() -> Arc<ScriptedApi> {
    let api = Arc::new(ScriptedApi::new());
    // Fetch order deliberately differs from creation order
    api.respond(
        "/members/member-1/boards",
        vec![
            board_record(BOARD_JAN_3),
            board_record(BOARD_JAN_1),
            board_record(BOARD_JAN_2),
        ],
    );
    for board in [BOARD_JAN_1, BOARD_JAN_2, BOARD_JAN_3] {
        api.respond(
            &format!("/boards/{board}/members"),
            vec![json!({"id": format!("user-of-{board}")})],
        );
    }
    api
}

#[tokio::test]
async fn test_child_stream_processes_parents_in_creation_order() {
    let api = users_api();
    let stream = make_stream("users", api.clone(), tap_config(""), BookmarkStore::in_memory());
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();

    let users = sink.for_stream("users");
    let board_ids: Vec<&str> = users
        .iter()
        .map(|u| u["boardId"].as_str().unwrap())
        .collect();
    assert_eq!(board_ids, vec![BOARD_JAN_1, BOARD_JAN_2, BOARD_JAN_3]);
}

#[tokio::test]
async fn test_parent_ids_requested_with_id_field_filter() {
    let api = users_api();
    let stream = make_stream("users", api.clone(), tap_config(""), BookmarkStore::in_memory());
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();

    let calls = api.calls_to("/members/member-1/boards");
    assert_eq!(param(&calls[0], "fields"), Some("id"));
}

#[tokio::test]
async fn test_child_stream_resumes_from_bookmarked_parent() {
    let api = users_api();
    let store = BookmarkStore::in_memory();
    store.set("users", BookmarkKey::ParentId, BOARD_JAN_2).await;

    let stream = make_stream("users", api, tap_config(""), store.clone());
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();

    // The bookmarked parent itself is reprocessed, earlier ones skipped
    let board_ids: Vec<&str> = sink
        .for_stream("users")
        .iter()
        .map(|u| u["boardId"].as_str().unwrap())
        .collect();
    assert_eq!(board_ids, vec![BOARD_JAN_2, BOARD_JAN_3]);

    // The bookmark is cleared once the loop completes
    assert!(store.get("users", BookmarkKey::ParentId).await.is_none());
}

#[tokio::test]
async fn test_unknown_parent_bookmark_processes_everything() {
    let api = users_api();
    let store = BookmarkStore::in_memory();
    store
        .set("users", BookmarkKey::ParentId, "ffffffff0000000000000000")
        .await;

    let stream = make_stream("users", api, tap_config(""), store);
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();
    assert_eq!(sink.for_stream("users").len(), 3);
}

// ============================================================================
// Date-window pagination
// ============================================================================

/// `count` actions on `board`, one second apart, newest at `newest`
fn feed(board: &str, newest: DateTime<Utc>, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            action(
                &format!("{board}-a{i}"),
                &format_timestamp(newest - Duration::seconds(i as i64)),
            )
        })
        .collect()
}

fn distinct_ids(records: &[&Record]) -> Vec<String> {
    let mut ids: Vec<String> = records
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

#[tokio::test]
async fn test_actions_scenario_two_boards() {
    // Two boards created 2024-01-02 and 2024-01-03, three actions each.
    let newest = parse_timestamp("2024-01-20T12:00:00Z").unwrap();
    let actions = HashMap::from([
        (BOARD_JAN_2.to_string(), feed(BOARD_JAN_2, newest, 3)),
        (BOARD_JAN_3.to_string(), feed(BOARD_JAN_3, newest, 3)),
    ]);
    let api = Arc::new(ActionsFeedApi::new(vec![BOARD_JAN_3, BOARD_JAN_2], actions));
    let config = tap_config(r#""end_date": "2024-02-01T00:00:00Z""#);
    let store = BookmarkStore::in_memory();

    let stream = make_stream("actions", api.clone(), config, store.clone());
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();

    assert_eq!(sink.for_stream("actions").len(), 6);

    // Boards drained in creation order
    let first_for_jan2 = &api.action_calls(BOARD_JAN_2)[0];
    let first_for_jan3 = &api.action_calls(BOARD_JAN_3)[0];
    assert!(api.calls.lock().unwrap()[1].0.contains(BOARD_JAN_2));

    // window_end captured once at sync start and shared by every parent
    assert_eq!(
        param(first_for_jan2, "before"),
        Some("2024-02-01T00:00:00.000Z")
    );
    assert_eq!(
        param(first_for_jan3, "before"),
        Some("2024-02-01T00:00:00.000Z")
    );
    // Lower bound backed off 1ms to make window_start inclusive
    assert_eq!(
        param(first_for_jan2, "since"),
        Some("2023-12-31T23:59:59.999Z")
    );

    // Window advanced; transient bookmarks cleared
    assert_eq!(
        store.get("actions", BookmarkKey::WindowStart).await,
        Some("2024-02-01T00:00:00.000Z".to_string())
    );
    assert!(store.get("actions", BookmarkKey::WindowEnd).await.is_none());
    assert!(store.get("actions", BookmarkKey::SubWindowEnd).await.is_none());
    assert!(store.get("actions", BookmarkKey::ParentId).await.is_none());
}

#[tokio::test]
async fn test_sub_window_cursor_drains_full_feed() {
    // 120 records against a cap of 50: three fetches, cursor walking
    // down to the oldest record of each full page +1ms.
    let newest = parse_timestamp("2024-01-15T00:00:00Z").unwrap();
    let actions = HashMap::from([(
        BOARD_JAN_1.to_string(),
        feed(BOARD_JAN_1, newest, 120),
    )]);
    let api = Arc::new(ActionsFeedApi::new(vec![BOARD_JAN_1], actions));
    let config = tap_config(
        r#""end_date": "2024-02-01T00:00:00Z", "actions_response_size": 50"#,
    );

    let stream = make_stream("actions", api.clone(), config, BookmarkStore::in_memory());
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();

    // Every record extracted exactly; boundary records may repeat at
    // page seams but nothing is ever lost
    let ids = distinct_ids(&sink.for_stream("actions"));
    assert_eq!(ids.len(), 120);

    let calls = api.action_calls(BOARD_JAN_1);
    assert_eq!(calls.len(), 3);

    // Page 1 oldest is newest-49s; page 2 oldest is newest-98s
    assert_eq!(param(&calls[0], "before"), Some("2024-02-01T00:00:00.000Z"));
    assert_eq!(
        param(&calls[1], "before"),
        Some(format_timestamp(newest - Duration::seconds(49) + Duration::milliseconds(1)).as_str())
    );
    assert_eq!(
        param(&calls[2], "before"),
        Some(format_timestamp(newest - Duration::seconds(98) + Duration::milliseconds(1)).as_str())
    );
}

#[tokio::test]
async fn test_window_boundary_records_are_never_lost_or_duplicated() {
    // One record exactly at window_start, one exactly at window_end.
    // The first belongs to this window; the second to the next one.
    let at_start = action("at-start", "2024-01-01T00:00:00.000Z");
    let at_end = action("at-end", "2024-01-10T00:00:00.000Z");
    let actions = HashMap::from([(
        BOARD_JAN_1.to_string(),
        vec![at_start, at_end],
    )]);
    let api = Arc::new(ActionsFeedApi::new(vec![BOARD_JAN_1], actions));
    let store = BookmarkStore::in_memory();

    let first_window = tap_config(r#""end_date": "2024-01-10T00:00:00Z""#);
    let stream = make_stream("actions", api.clone(), first_window, store.clone());
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();
    let first_ids = distinct_ids(&sink.for_stream("actions"));
    assert_eq!(first_ids, vec!["at-start".to_string()]);

    // Next sync picks up where the last window ended
    let second_window = tap_config(r#""end_date": "2024-01-20T00:00:00Z""#);
    let stream = make_stream("actions", api, second_window, store);
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();
    let second_ids = distinct_ids(&sink.for_stream("actions"));
    assert_eq!(second_ids, vec!["at-end".to_string()]);
}

#[tokio::test]
async fn test_out_of_order_feed_fails_fast() {
    // An ascending pair in a descending feed: fatal, and nothing past
    // the violation is yielded.
    let api = Arc::new(ScriptedApi::new());
    api.respond("/members/member-1/boards", vec![board_record(BOARD_JAN_1)]);
    api.respond(
        &format!("/boards/{BOARD_JAN_1}/actions"),
        vec![
            action("a1", "2024-01-03T00:00:00.000Z"),
            action("a2", "2024-01-02T00:00:00.000Z"),
            action("a3", "2024-01-04T00:00:00.000Z"), // out of order
            action("a4", "2024-01-01T00:00:00.000Z"),
        ],
    );

    let config = tap_config(r#""end_date": "2024-02-01T00:00:00Z""#);
    let stream = make_stream("actions", api, config, BookmarkStore::in_memory());
    let mut sink = CollectSink::new();
    let err = stream.sync(&mut sink).await.unwrap_err();

    assert!(matches!(err, Error::OutOfOrder { .. }));
    assert_eq!(sink.for_stream("actions").len(), 2);
}

#[tokio::test]
async fn test_inconsistent_bookmarks_fatal_at_sync_start() {
    let store = BookmarkStore::in_memory();
    store
        .set("actions", BookmarkKey::SubWindowEnd, "2024-01-05T00:00:00.000Z")
        .await;

    let api = Arc::new(ActionsFeedApi::new(vec![BOARD_JAN_1], HashMap::new()));
    let stream = make_stream("actions", api, tap_config(""), store);
    let mut sink = CollectSink::new();
    let err = stream.sync(&mut sink).await.unwrap_err();
    assert!(matches!(err, Error::InvalidBookmarks { .. }));
    assert!(sink.records.is_empty());
}

#[tokio::test]
async fn test_resume_mid_sub_window_uses_persisted_cursor() {
    let newest = parse_timestamp("2024-01-15T00:00:00Z").unwrap();
    let actions = HashMap::from([
        (BOARD_JAN_1.to_string(), feed(BOARD_JAN_1, newest, 5)),
        (BOARD_JAN_2.to_string(), feed(BOARD_JAN_2, newest, 5)),
    ]);
    let api = Arc::new(ActionsFeedApi::new(vec![BOARD_JAN_1, BOARD_JAN_2], actions));

    // State left behind by an interrupted run: mid-sub-window on the
    // second board
    let store = BookmarkStore::in_memory();
    store
        .set("actions", BookmarkKey::WindowStart, "2024-01-01T00:00:00.000Z")
        .await;
    store
        .set("actions", BookmarkKey::WindowEnd, "2024-01-20T00:00:00.000Z")
        .await;
    store
        .set("actions", BookmarkKey::SubWindowEnd, "2024-01-14T23:59:58.001Z")
        .await;
    store.set("actions", BookmarkKey::ParentId, BOARD_JAN_2).await;

    let stream = make_stream("actions", api.clone(), tap_config(""), store.clone());
    let mut sink = CollectSink::new();
    stream.sync(&mut sink).await.unwrap();

    // First board skipped entirely
    assert!(api.action_calls(BOARD_JAN_1).is_empty());

    // First fetch for the resumed board honors the persisted sub-cursor
    let calls = api.action_calls(BOARD_JAN_2);
    assert_eq!(param(&calls[0], "before"), Some("2024-01-14T23:59:58.001Z"));

    // Records older than the cursor are re-extracted (3 of 5)
    assert_eq!(sink.for_stream("actions").len(), 3);

    // Sub-window finished: cursor cleared and window advanced
    assert!(store.get("actions", BookmarkKey::SubWindowEnd).await.is_none());
    assert_eq!(
        store.get("actions", BookmarkKey::WindowStart).await,
        Some("2024-01-20T00:00:00.000Z".to_string())
    );
}

#[tokio::test]
async fn test_interrupted_sync_resumes_without_omissions() {
    // Interrupt mid-second-board, resume, and compare against an
    // uninterrupted run from the same start date.
    let newest = parse_timestamp("2024-01-15T00:00:00Z").unwrap();
    let actions = HashMap::from([
        (BOARD_JAN_1.to_string(), feed(BOARD_JAN_1, newest, 30)),
        (BOARD_JAN_2.to_string(), feed(BOARD_JAN_2, newest, 30)),
    ]);
    let config = tap_config(
        r#""end_date": "2024-02-01T00:00:00Z", "actions_response_size": 10"#,
    );

    let make_api = || {
        Arc::new(ActionsFeedApi::new(
            vec![BOARD_JAN_1, BOARD_JAN_2],
            actions.clone(),
        ))
    };

    // Interrupted run
    let store = BookmarkStore::in_memory();
    let stream = make_stream("actions", make_api(), config.clone(), store.clone());
    let mut failing = FailingSink::after(35);
    assert!(stream.sync(&mut failing).await.is_err());

    // Resume on the same state
    let stream = make_stream("actions", make_api(), config.clone(), store.clone());
    let mut resumed = CollectSink::new();
    stream.sync(&mut resumed).await.unwrap();

    // Reference: uninterrupted run from scratch
    let stream = make_stream(
        "actions",
        make_api(),
        config,
        BookmarkStore::in_memory(),
    );
    let mut reference = CollectSink::new();
    stream.sync(&mut reference).await.unwrap();

    let mut recovered: Vec<(String, Record)> = failing.inner.records;
    recovered.extend(resumed.records);
    let recovered_refs: Vec<&Record> = recovered.iter().map(|(_, r)| r).collect();
    let reference_refs: Vec<&Record> = reference.records.iter().map(|(_, r)| r).collect();

    // Duplicates from reprocessing are fine; omissions are not
    assert_eq!(distinct_ids(&recovered_refs), distinct_ids(&reference_refs));
    assert_eq!(distinct_ids(&reference_refs).len(), 60);
}
