mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use thegame_backend::{AppState, apns::MemoryDirectory, router::create_router};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{harness, user};

fn directory() -> MemoryDirectory {
    let mut alice = user(1, Some("alice-device"));
    alice.user_key = Some("alice-key".to_string());
    alice.alias = Some("Alice".to_string());

    let mut nameless = user(5, None);
    nameless.user_key = Some("nameless-key".to_string());
    nameless.username = None;

    MemoryDirectory::new()
        .with_user(alice)
        .with_user(user(2, Some("bob-device")))
        .with_user(user(3, None))
        .with_user(nameless)
        .with_opponent(100, 1, 2)
        .with_opponent(101, 1, 3)
}

async fn post_poke(server: &MockServer, body: Value) -> (StatusCode, Value) {
    let h = harness(&server.uri(), directory());
    let state = AppState {
        dispatcher: h.dispatcher.clone(),
        matches: h.directory.clone(),
    };
    let app = create_router(state, "/api");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/game/poke")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn poke_notifies_opponent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/3/device/bob-device"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_poke(&server, json!({"userkey": "alice-key", "match_id": 100})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"rc": 0}));

    let requests = server.received_requests().await.unwrap();
    let payload: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        payload["aps"]["alert"]["title"],
        "You have been poked by Alice"
    );
}

#[tokio::test]
async fn unknown_userkey_returns_invalid_userkey() {
    let server = MockServer::start().await;
    let (status, body) = post_poke(&server, json!({"userkey": "nobody", "match_id": 100})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"rc": 1}));
}

#[tokio::test]
async fn missing_opponent_returns_invalid_opponent() {
    let server = MockServer::start().await;
    let (status, body) = post_poke(&server, json!({"userkey": "alice-key", "match_id": 999})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"rc": 2}));
}

#[tokio::test]
async fn opponent_without_device_returns_notification_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = post_poke(&server, json!({"userkey": "alice-key", "match_id": 101})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"rc": 3}));
}

#[tokio::test]
async fn sender_without_name_is_not_found() {
    let server = MockServer::start().await;
    let (status, body) =
        post_poke(&server, json!({"userkey": "nameless-key", "match_id": 100})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn gateway_rejection_maps_to_apns_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"reason":"InternalServerError"}"#))
        .mount(&server)
        .await;

    let (status, body) = post_poke(&server, json!({"userkey": "alice-key", "match_id": 100})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"rc": 5}));
}

#[tokio::test]
async fn health_check_responds() {
    let server = MockServer::start().await;
    let h = harness(&server.uri(), MemoryDirectory::new());
    let app = create_router(
        AppState {
            dispatcher: h.dispatcher.clone(),
            matches: h.directory.clone(),
        },
        "/api",
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
