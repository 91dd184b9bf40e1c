//! Tests d'intégration de l'API radio montée sur pmoserver

mod common;

use axum::http::StatusCode;
use common::{ordered_config, radio, send, tracks};
use pmoplaylist::HistoryOrder;
use pmoradio::config::HistoryConfig;
use pmoradio::{CatchUpPolicy, RadioConfig};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn titles(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|t| t["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_empty_playlist_reports_idle_state() {
    let radio = radio(ordered_config(), Vec::new()).await;

    let (status, state) = send(&radio.router, "GET", "/api/radio/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(state["current_track"].is_null());
    assert_eq!(state["playlist_count"], 0);

    let (status, _) = send(&radio.router, "POST", "/api/radio/favorites/save", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, state) = send(&radio.router, "POST", "/api/radio/next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(state["current_track"].is_null());
}

#[tokio::test]
async fn test_track_end_is_detected_on_read() {
    let radio = radio(ordered_config(), tracks(&[5, 5])).await;

    radio.clock.advance_secs(3.0);
    let (_, state) = send(&radio.router, "GET", "/api/radio/state", None).await;
    assert_eq!(state["current_track"]["title"], "Song 1");
    assert_eq!(state["position"], 3.0);

    radio.clock.advance_secs(3.0);
    let (_, state) = send(&radio.router, "GET", "/api/radio/state", None).await;
    assert_eq!(state["current_track"]["title"], "Song 2");
    assert_eq!(state["position"], 0.0);
    assert_eq!(state["just_played"]["title"], "Song 1");

    let (_, again) = send(&radio.router, "GET", "/api/radio/state", None).await;
    assert_eq!(again["current_track"]["title"], "Song 2");
    assert_eq!(again["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_forced_rotation_and_history() {
    let config = RadioConfig {
        history: HistoryConfig {
            capacity: 2,
            order: HistoryOrder::NewestFirst,
        },
        ..ordered_config()
    };
    let radio = radio(config, tracks(&[10, 20, 30])).await;

    for _ in 0..2 {
        send(&radio.router, "POST", "/api/radio/next", None).await;
    }
    let (status, state) = send(&radio.router, "POST", "/api/radio/next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["current_track"]["title"], "Song 1");
    assert_eq!(titles(&state["history"]), vec!["Song 3", "Song 2"]);
    assert_eq!(titles(&state["up_next"]), vec!["Song 2", "Song 3", "Song 1"]);
}

#[tokio::test]
async fn test_timeline_catch_up_over_http() {
    let config = RadioConfig {
        catch_up: CatchUpPolicy::Timeline,
        ..ordered_config()
    };
    let radio = radio(config, tracks(&[10, 20, 30])).await;

    radio.clock.advance_secs(32.0);
    let (_, state) = send(&radio.router, "GET", "/api/radio/state", None).await;
    assert_eq!(state["current_track"]["title"], "Song 3");
    assert_eq!(state["position"], 2.0);
}

#[tokio::test]
async fn test_failed_submission_is_rejected() {
    let radio = radio(ordered_config(), tracks(&[10])).await;

    let (status, body) = send(
        &radio.router,
        "POST",
        "/api/radio/playlist",
        Some(json!({"locator": "https://youtu.be/broken"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "RESOLUTION_FAILED");

    let (_, playlist) = send(&radio.router, "GET", "/api/radio/playlist", None).await;
    assert_eq!(playlist["count"], 1);
}

#[tokio::test]
async fn test_submission_is_appended() {
    let radio = radio(ordered_config(), tracks(&[10])).await;

    let (status, track) = send(
        &radio.router,
        "POST",
        "/api/radio/playlist",
        Some(json!({"locator": "abc123", "artist": "Extremoduro"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(track["title"], "Video abc123");
    assert_eq!(track["artist"], "Extremoduro");
    assert_eq!(track["duration"], 180);

    let (_, playlist) = send(&radio.router, "GET", "/api/radio/playlist", None).await;
    assert_eq!(playlist["count"], 2);
    assert_eq!(titles(&playlist["tracks"]).last().unwrap(), "Video abc123");
}

#[tokio::test]
async fn test_stream_unavailable_then_recovered() {
    let radio = radio(ordered_config(), Vec::new()).await;
    radio.resolver.fail_on("song-1");
    radio.service.store().enqueue(tracks(&[60])).await;

    let (status, body) = send(&radio.router, "GET", "/api/radio/stream", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "AUDIO_UNAVAILABLE");

    let (status, _) = send(&radio.router, "GET", "/api/radio/favorites/stream", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_keep_last_save() {
    let radio = radio(ordered_config(), tracks(&[10, 10])).await;

    let (status, _) = send(&radio.router, "POST", "/api/radio/favorites/save", None).await;
    assert_eq!(status, StatusCode::OK);
    send(&radio.router, "POST", "/api/radio/next", None).await;
    send(&radio.router, "POST", "/api/radio/favorites/save", None).await;

    let (status, favorite) = send(&radio.router, "GET", "/api/radio/favorites/get", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(favorite["track"]["title"], "Song 2");

    let (status, stream) = send(&radio.router, "GET", "/api/radio/favorites/stream", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stream["audio_url"], "https://googlevideo.test/song-2");

    assert_ok!(radio.service.favorites().get().await);
}

#[tokio::test]
async fn test_share_and_info() {
    let radio = radio(ordered_config(), tracks(&[10])).await;

    let (status, share) = send(&radio.router, "GET", "/api/radio/share/current", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(share["title"], "🎸 Song 1 - Band");
    assert_eq!(share["description"], "Now playing on Madrid Rock Radio");
    assert_eq!(share["image"], "https://i.ytimg.test/song-1.jpg");
    let url = share["url"].as_str().unwrap();
    assert!(url.starts_with("https://madridrock.radio/?track="));

    let (_, info) = send(&radio.router, "GET", "/api/radio/info", None).await;
    assert_eq!(info["name"], "Madrid Rock Radio");
    assert_eq!(info["source_kind"], "youtube");
    assert_eq!(info["rotation"], "rotate_to_tail");
    assert_eq!(info["playlist_count"], 1);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let radio = radio(ordered_config(), Vec::new()).await;

    let (status, doc) = send(&radio.router, "GET", "/api-docs/radio.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/radio/state"].is_object());
    assert!(doc["paths"]["/api/radio/favorites/stream"].is_object());

    assert_err!(radio.service.favorites().get().await);
}
