use super::*;

use rmcp::ServiceExt;
use rmcp::model::CallToolRequestParam;

fn extract_json(result: &CallToolResult) -> serde_json::Value {
    let text = result
        .content
        .first()
        .and_then(|content| content.as_text())
        .map(|text| text.text.as_str())
        .expect("tool result should include text content");

    serde_json::from_str(text).expect("tool text content should be valid JSON")
}

fn arguments(value: serde_json::Value) -> Option<serde_json::Map<String, serde_json::Value>> {
    value.as_object().cloned()
}

async fn call_tool_via_router(
    tool_name: &str,
    arguments: Option<serde_json::Map<String, serde_json::Value>>,
) -> Result<CallToolResult, String> {
    let (client_io, server_io) = tokio::io::duplex(64 * 1024);
    let (server_result, client_result) = tokio::join!(
        CamflowServer::new().serve(server_io),
        ().serve(client_io)
    );
    let mut server = server_result.expect("server should start over in-memory transport");
    let mut client = client_result.expect("client should connect over in-memory transport");

    let result = client
        .call_tool(CallToolRequestParam {
            name: tool_name.to_owned().into(),
            arguments,
        })
        .await
        .map_err(|e| e.to_string());

    client
        .cancel()
        .await
        .expect("client should close cleanly after tool call");
    server
        .cancel()
        .await
        .expect("server should close cleanly after tool call");

    result
}

fn sample_tracks() -> serde_json::Value {
    serde_json::json!([
        { "artist": "A", "title": "T1", "key": "5A", "bpm": "120" },
        { "artist": "B", "title": "T2", "key": "4A", "bpm": 124 },
        { "artist": "C", "title": "T3", "key": "1B", "bpm": 122 },
    ])
}

#[tokio::test]
async fn build_set_groups_tracks_along_the_path() {
    let result = call_tool_via_router(
        "build_set",
        arguments(serde_json::json!({
            "tracks": sample_tracks(),
            "starting_track": "t1",
            "direction": "clockwise",
        })),
    )
    .await
    .expect("build_set should succeed");

    let payload = extract_json(&result);
    assert_eq!(payload["starting_key"], "5A");
    assert_eq!(payload["direction"], "clockwise");

    let groups = payload["groups"].as_array().expect("groups should be an array");
    assert_eq!(groups.len(), 6);
    assert_eq!(groups[0]["group"], "5A");
    assert_eq!(groups[0]["tracks"][0], "A – T1 (5A) – 120.0 BPM");

    // 4A semitone-shifts onto 9A; 1B mode-shifts onto 10A.
    assert_eq!(
        groups[4]["tracks"][0],
        "B – T2 (from 4A) – 124.0 BPM (-1 semitone shift)"
    );
    assert_eq!(
        groups[5]["tracks"][0],
        "C – T3 (from 1B) – 122.0 BPM (mode shift)"
    );
}

#[tokio::test]
async fn build_set_accepts_explicit_start_key_and_bpm() {
    let result = call_tool_via_router(
        "build_set",
        arguments(serde_json::json!({
            "tracks": [{ "artist": "A", "title": "T1", "key": "5A", "bpm": 120 }],
            "start_key": "8B",
            "start_bpm": 120,
            "direction": "clockwise",
        })),
    )
    .await
    .expect("build_set should succeed");

    let payload = extract_json(&result);
    // 8B normalizes to its relative minor 5A.
    assert_eq!(payload["starting_key"], "5A");
    assert_eq!(payload["groups"][0]["group"], "5A");
    assert_eq!(payload["groups"][0]["tracks"][0], "A – T1 (5A) – 120.0 BPM");
}

#[tokio::test]
async fn build_set_auto_selects_the_better_direction() {
    // Two 12B tracks mode-shift onto 9A, visited only counter-clockwise
    // from 1A; one 7B track fits only clockwise.
    let result = call_tool_via_router(
        "build_set",
        arguments(serde_json::json!({
            "tracks": [
                { "artist": "S", "title": "Start", "key": "1A", "bpm": 120 },
                { "artist": "A", "title": "One", "key": "12B", "bpm": 121 },
                { "artist": "B", "title": "Two", "key": "12B", "bpm": 123 },
                { "artist": "C", "title": "Three", "key": "7B", "bpm": 125 },
            ],
            "starting_track": "start",
        })),
    )
    .await
    .expect("build_set should succeed");

    let payload = extract_json(&result);
    assert_eq!(payload["direction"], "counter-clockwise");
}

#[tokio::test]
async fn build_set_reports_records_skipped_for_bad_tempos() {
    let result = call_tool_via_router(
        "build_set",
        arguments(serde_json::json!({
            "tracks": [
                { "artist": "A", "title": "T1", "key": "5A", "bpm": "120" },
                { "artist": "B", "title": "Broken", "key": "6A", "bpm": "fast" },
            ],
            "starting_track": "t1",
            "direction": "clockwise",
        })),
    )
    .await
    .expect("build_set should succeed");

    let payload = extract_json(&result);
    assert_eq!(payload["skipped_tracks"], 1);
    let groups = payload["groups"].as_array().expect("groups should be an array");
    let total: usize = groups
        .iter()
        .map(|group| group["tracks"].as_array().map_or(0, Vec::len))
        .sum();
    assert_eq!(total, 1, "the broken record must not appear in any group");
}

#[tokio::test]
async fn build_set_requires_a_start_selector_or_key() {
    let error = call_tool_via_router(
        "build_set",
        arguments(serde_json::json!({ "tracks": sample_tracks() })),
    )
    .await
    .expect_err("build_set without a start should fail");
    assert!(
        error.contains("starting_track or start_key"),
        "unexpected error: {error}"
    );
}

#[tokio::test]
async fn build_set_rejects_unmatched_start_selector() {
    let error = call_tool_via_router(
        "build_set",
        arguments(serde_json::json!({
            "tracks": sample_tracks(),
            "starting_track": "does not exist",
        })),
    )
    .await
    .expect_err("unmatched selector should fail");
    assert!(error.contains("Starting track not found"), "unexpected error: {error}");
}

#[tokio::test]
async fn build_set_rejects_start_track_with_broken_tempo() {
    let error = call_tool_via_router(
        "build_set",
        arguments(serde_json::json!({
            "tracks": [{ "artist": "A", "title": "T1", "key": "5A", "bpm": "fast" }],
            "starting_track": "t1",
        })),
    )
    .await
    .expect_err("a starting track without a usable BPM is fatal");
    assert!(error.contains("unparseable tempo"), "unexpected error: {error}");
}

#[tokio::test]
async fn build_set_rejects_unrecognized_start_key() {
    let error = call_tool_via_router(
        "build_set",
        arguments(serde_json::json!({
            "tracks": sample_tracks(),
            "start_key": "Gm",
            "start_bpm": 120,
        })),
    )
    .await
    .expect_err("non-Camelot start key should fail");
    assert!(error.contains("not a recognized Camelot key"), "unexpected error: {error}");
}

#[tokio::test]
async fn choose_direction_reports_counts_and_winner() {
    let result = call_tool_via_router(
        "choose_direction",
        arguments(serde_json::json!({
            "tracks": [
                { "artist": "A", "title": "One", "key": "12B", "bpm": 120 },
                { "artist": "B", "title": "Two", "key": "12B", "bpm": 121 },
                { "artist": "C", "title": "Three", "key": "7B", "bpm": 122 },
            ],
            "start_key": "1A",
        })),
    )
    .await
    .expect("choose_direction should succeed");

    let payload = extract_json(&result);
    assert_eq!(payload["start_key"], "1A");
    assert_eq!(payload["clockwise_count"], 1);
    assert_eq!(payload["counter_clockwise_count"], 2);
    assert_eq!(payload["direction"], "counter-clockwise");
}

#[tokio::test]
async fn generate_path_lists_six_positions() {
    let result = call_tool_via_router(
        "generate_path",
        arguments(serde_json::json!({ "start_key": "5A", "direction": "clockwise" })),
    )
    .await
    .expect("generate_path should succeed");

    let payload = extract_json(&result);
    assert_eq!(
        payload["path"],
        serde_json::json!(["5A", "6A", "7A", "8A", "9A", "10A"])
    );
}

#[tokio::test]
async fn generate_path_converts_major_starts() {
    let result = call_tool_via_router(
        "generate_path",
        arguments(serde_json::json!({ "start_key": "8B", "direction": "counter-clockwise" })),
    )
    .await
    .expect("generate_path should succeed");

    let payload = extract_json(&result);
    assert_eq!(payload["start_key"], "5A");
    assert_eq!(
        payload["path"],
        serde_json::json!(["5A", "4A", "3A", "2A", "1A", "12A"])
    );
}
