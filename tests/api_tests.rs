//! Router level tests for the HTTP API.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::get as get_route,
    Router,
};
use moodcanvas_rs::config::Config;
use moodcanvas_rs::server::{build_router, build_router_with, AppState};
use moodcanvas_rs::service::RecommendationService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

fn setup() -> (Router, Arc<RecommendationService>) {
    let service = Arc::new(RecommendationService::default());
    let state = AppState::new(Config::default(), service.clone());
    (build_router(state), service)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, body)
}

fn ids(body: &Value) -> Vec<String> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Status
// =============================================================================

#[tokio::test]
async fn test_status() {
    let (app, _) = setup();
    let (status, body) = send(&app, get("/api/status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["totalTracks"], 21);
    assert_eq!(body["activeSessions"], 0);
    assert_eq!(
        body["emotionTypes"],
        json!(["happy", "sad", "neutral", "angry", "surprised", "fearful", "disgusted"])
    );
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_status_counts_sessions() {
    let (app, _) = setup();
    send(&app, get("/api/session?sessionId=a")).await;
    send(&app, get("/api/session?sessionId=b")).await;
    send(&app, get("/api/session?sessionId=a")).await;

    let (_, body) = send(&app, get("/api/status")).await;
    assert_eq!(body["activeSessions"], 2);
}

// =============================================================================
// Recording emotions
// =============================================================================

#[tokio::test]
async fn test_record_emotion_normalizes_input() {
    let (app, service) = setup();
    let (status, body) = send(
        &app,
        post_json("/api/emotions", &json!({"emotion": "Happy", "confidence": "0.9"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["emotion"], "happy");
    assert_eq!(body["data"]["confidence"], 0.9);
    assert_eq!(body["data"]["sessionId"], "anonymous");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["timestamp"].is_string());
    assert_eq!(service.list_emotions(None, usize::MAX).await.len(), 1);
}

#[tokio::test]
async fn test_record_emotion_keeps_given_session_and_timestamp() {
    let (app, _) = setup();
    let (_, body) = send(
        &app,
        post_json(
            "/api/emotions",
            &json!({
                "emotion": "SAD",
                "confidence": 0.4,
                "sessionId": "s-42",
                "timestamp": "2026-01-01T08:00:00.000Z"
            }),
        ),
    )
    .await;

    assert_eq!(body["data"]["emotion"], "sad");
    assert_eq!(body["data"]["sessionId"], "s-42");
    assert_eq!(body["data"]["timestamp"], "2026-01-01T08:00:00.000Z");
}

#[tokio::test]
async fn test_record_emotion_missing_confidence() {
    let (app, service) = setup();
    let (status, body) = send(&app, post_json("/api/emotions", &json!({"emotion": "happy"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing emotion or confidence");
    assert_eq!(service.list_emotions(None, usize::MAX).await.len(), 0);
}

#[tokio::test]
async fn test_record_emotion_missing_emotion() {
    let (app, service) = setup();
    let (status, body) = send(&app, post_json("/api/emotions", &json!({"confidence": 0.5}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(service.list_emotions(None, usize::MAX).await.len(), 0);
}

#[tokio::test]
async fn test_record_emotion_malformed_body() {
    let (app, service) = setup();
    let request = Request::builder()
        .method("POST")
        .uri("/api/emotions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(service.list_emotions(None, usize::MAX).await.len(), 0);
}

// =============================================================================
// Recommendations
// =============================================================================

#[tokio::test]
async fn test_recommendations_default() {
    let (app, _) = setup();
    let (status, body) = send(&app, get("/api/recommendations/Happy")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["emotion"], "happy");
    assert_eq!(ids(&body), vec!["h1", "h2", "h3"]);

    let first = &body["recommendations"][0];
    assert_eq!(first["url"], "/api/music/h1");
    assert_eq!(first["title"], "Sunshine Day");
    assert!(first["recommendedAt"].is_string());
}

#[tokio::test]
async fn test_recommendations_unknown_emotion_uses_neutral() {
    let (app, _) = setup();
    let (status, body) = send(&app, get("/api/recommendations/bored")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "bored");
    assert_eq!(ids(&body), vec!["n1", "n2", "n3"]);
}

#[tokio::test]
async fn test_recommendations_intensity() {
    let (app, _) = setup();

    let (_, body) = send(&app, get("/api/recommendations/surprised?intensity=0.8")).await;
    let recs = body["recommendations"].as_array().unwrap();
    assert!(!recs.is_empty());
    assert!(recs.iter().all(|t| t["energy"].as_u64().unwrap() >= 6));

    let (_, body) = send(&app, get("/api/recommendations/disgusted?intensity=0.2")).await;
    let recs = body["recommendations"].as_array().unwrap();
    assert!(!recs.is_empty());
    assert!(recs.iter().all(|t| t["energy"].as_u64().unwrap() <= 4));

    let (_, body) = send(&app, get("/api/recommendations/sad?intensity=0.9")).await;
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendations_limit() {
    let (app, _) = setup();

    let (_, body) = send(&app, get("/api/recommendations/angry?limit=2")).await;
    assert_eq!(ids(&body), vec!["a1", "a2"]);

    let (_, body) = send(&app, get("/api/recommendations/happy?limit=2&intensity=0.2")).await;
    assert!(ids(&body).is_empty());

    let (_, body) = send(&app, get("/api/recommendations/happy?limit=abc")).await;
    assert_eq!(ids(&body).len(), 3);
}

#[tokio::test]
async fn test_recommendations_shuffle_keeps_set() {
    let (app, _) = setup();
    let (_, body) = send(&app, get("/api/recommendations/fearful?shuffle=true&limit=10")).await;

    let mut got = ids(&body);
    got.sort();
    assert_eq!(got, vec!["f1", "f2", "f3"]);
}

// =============================================================================
// Tracks
// =============================================================================

#[tokio::test]
async fn test_get_track() {
    let (app, _) = setup();
    let (status, body) = send(&app, get("/api/music/h1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["track"]["id"], "h1");
    assert_eq!(body["track"]["demo"], true);
    assert_eq!(body["track"]["message"], "Demo mode - no actual audio file");
}

#[tokio::test]
async fn test_get_track_not_found() {
    let (app, _) = setup();
    let (status, body) = send(&app, get("/api/music/nonexistent")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Track not found");
}

// =============================================================================
// Sessions and history
// =============================================================================

#[tokio::test]
async fn test_session_reuse() {
    let (app, _) = setup();

    let (status, first) = send(&app, get("/api/session?sessionId=abc")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["session"]["id"], "abc");

    let (_, second) = send(&app, get("/api/session?sessionId=abc")).await;
    assert_eq!(second["session"]["id"], "abc");
    assert_eq!(second["session"]["createdAt"], first["session"]["createdAt"]);

    // Same fixed-width format, so string order is time order.
    let before = first["session"]["lastActivity"].as_str().unwrap();
    let after = second["session"]["lastActivity"].as_str().unwrap();
    assert!(after >= before);
}

#[tokio::test]
async fn test_session_generates_id() {
    let (app, _) = setup();
    let (_, body) = send(&app, get("/api/session")).await;

    let id = body["session"]["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(body["session"]["emotionHistory"], json!([]));
}

#[tokio::test]
async fn test_session_history_lists_observations() {
    let (app, _) = setup();
    send(
        &app,
        post_json("/api/emotions", &json!({"emotion": "happy", "confidence": 0.7, "sessionId": "mine"})),
    )
    .await;
    send(
        &app,
        post_json("/api/emotions", &json!({"emotion": "sad", "confidence": 0.7, "sessionId": "other"})),
    )
    .await;

    let (_, body) = send(&app, get("/api/session?sessionId=mine")).await;
    let history = body["session"]["emotionHistory"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["emotion"], "happy");
}

#[tokio::test]
async fn test_list_emotions_newest_first() {
    let (app, _) = setup();
    for (emotion, ts) in [
        ("happy", "2026-03-01T10:00:00.000Z"),
        ("sad", "2026-03-01T11:00:00.000Z"),
        ("angry", "2026-03-01T12:00:00.000Z"),
    ] {
        send(
            &app,
            post_json(
                "/api/emotions",
                &json!({"emotion": emotion, "confidence": 0.5, "timestamp": ts}),
            ),
        )
        .await;
    }

    let (status, body) = send(&app, get("/api/emotions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let emotions: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["emotion"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(emotions, vec!["angry", "sad", "happy"]);

    let (_, body) = send(&app, get("/api/emotions?limit=1")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["emotion"], "angry");
}

#[tokio::test]
async fn test_list_emotions_by_session() {
    let (app, _) = setup();
    for (emotion, session) in [("happy", "s1"), ("sad", "s2"), ("angry", "s1")] {
        send(
            &app,
            post_json(
                "/api/emotions",
                &json!({"emotion": emotion, "confidence": 1, "sessionId": session}),
            ),
        )
        .await;
    }

    let (_, body) = send(&app, get("/api/emotions?sessionId=s1")).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|o| o["sessionId"] == "s1"));
}

// =============================================================================
// Catch-all and transport behaviour
// =============================================================================

#[tokio::test]
async fn test_catch_all_describes_api() {
    let (app, _) = setup();
    let (status, body) = send(&app, get("/some/unknown/page")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "MoodCanvas Singer API");
    let endpoints = body["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), 6);
    assert!(endpoints.contains(&json!("GET /api/recommendations/:emotion")));
}

#[tokio::test]
async fn test_unmatched_post_is_not_found() {
    let (app, _) = setup();
    let (status, body) = send(&app, post_json("/api/unknown", &json!({}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_repeated_slashes_are_collapsed() {
    let (app, _) = setup();
    let (status, body) = send(&app, get("//api//music/h2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["track"]["id"], "h2");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _) = setup();
    let request = Request::builder()
        .method("GET")
        .uri("/api/status")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_invalid_utf8_path_segment() {
    let (app, _) = setup();

    for uri in ["/api/music/%FF", "/api/recommendations/%FF"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Invalid request path");
    }
}

#[tokio::test]
async fn test_wrong_method_on_known_path() {
    let (app, service) = setup();

    let delete = Request::builder()
        .method("DELETE")
        .uri("/api/emotions")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, delete).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");

    let (status, body) = send(&app, post_json("/api/status", &json!({}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");

    assert!(service.list_emotions(None, usize::MAX).await.is_empty());
}

async fn failing_handler() -> &'static str {
    panic!("handler failed with secret detail")
}

#[tokio::test]
async fn test_handler_panic_becomes_internal_error() {
    let service = Arc::new(RecommendationService::default());
    let state = AppState::new(Config::default(), service);
    let extra = Router::new().route("/api/fail", get_route(failing_handler));
    let app = build_router_with(state, extra);

    let (status, body) = send(&app, get("/api/fail")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));

    // The router keeps serving after a panic.
    let (status, _) = send(&app, get("/api/status")).await;
    assert_eq!(status, StatusCode::OK);
}
