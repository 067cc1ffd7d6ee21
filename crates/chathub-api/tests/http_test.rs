//! HTTP boundary tests driven through `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use chathub_api::{AppState, build_app};
use chathub_core::config::AppConfig;
use chathub_core::types::{ChatId, UserId};

const INTERNAL_KEY: &str = "internal-test-key";

fn config(internal_key: Option<&str>) -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "http-test-secret".to_string();
    config.auth.internal_api_key = internal_key.map(str::to_string);
    config.realtime.ping_interval_seconds = 0;
    config
}

fn app(internal_key: Option<&str>) -> (Router, AppState) {
    let state = AppState::new(config(internal_key));
    (build_app(state.clone()), state)
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-internal-key", INTERNAL_KEY);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app(None);
    let response = app
        .oneshot(request(Method::GET, "/api/health", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_internal_routes_require_key() {
    let (app, _) = app(Some(INTERNAL_KEY));

    let missing = Request::builder()
        .uri("/internal/stats")
        .body(Body::empty())
        .expect("request builds");
    let response = app.clone().oneshot(missing).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "UNAUTHORIZED");

    let same_length = Request::builder()
        .uri("/internal/stats")
        .header("x-internal-key", "internal-test-kez")
        .body(Body::empty())
        .expect("request builds");
    let response = app.clone().oneshot(same_length).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(request(Method::GET, "/internal/stats", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_membership_routes_update_cache() {
    let (app, state) = app(Some(INTERNAL_KEY));

    let response = app
        .clone()
        .oneshot(request(
            Method::PUT,
            "/internal/chats/7/members",
            Some(json!({ "members": [1, 2, 3] })),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.membership.is_member(ChatId(7), UserId(3)));

    let response = app
        .clone()
        .oneshot(request(Method::DELETE, "/internal/chats/7/members/3", None))
        .await
        .expect("response");
    assert_eq!(json_body(response).await["changed"], true);
    assert!(!state.membership.is_member(ChatId(7), UserId(3)));

    let response = app
        .clone()
        .oneshot(request(Method::POST, "/internal/chats/7/members/4", None))
        .await
        .expect("response");
    assert_eq!(json_body(response).await["changed"], true);
    assert!(state.membership.is_member(ChatId(7), UserId(4)));

    let response = app
        .oneshot(request(Method::DELETE, "/internal/chats/7", None))
        .await
        .expect("response");
    assert_eq!(json_body(response).await["changed"], true);
    assert_eq!(state.membership.chat_count(), 0);
}

#[tokio::test]
async fn test_dispatch_fans_out_and_dedups() {
    let (app, state) = app(None);
    state
        .membership
        .set_members(ChatId(7), [UserId(1), UserId(2), UserId(3)]);
    let (_peer, mut peer_rx) = state.hub.attach(UserId(2));

    let body = json!({
        "type": "new_message",
        "data": { "chat_id": 7, "message_id": 5 },
        "dedup_key": "msg:7:5",
        "scope": { "to_chat_except": { "chat_id": 7, "exclude": 1 } }
    });

    let response = app
        .clone()
        .oneshot(request(Method::POST, "/internal/dispatch", Some(body.clone())))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let report = json_body(response).await;
    assert_eq!(report["targets"], 2);
    assert_eq!(report["delivered"], 1);
    assert_eq!(report["offline"], 1);

    let envelope = peer_rx.try_recv().expect("peer received");
    assert_eq!(envelope.kind, "new_message");
    assert_eq!(envelope.data["message_id"], 5);

    let response = app
        .oneshot(request(Method::POST, "/internal/dispatch", Some(body)))
        .await
        .expect("response");
    assert_eq!(json_body(response).await["deduplicated"], true);
    assert!(peer_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_dispatch_rejects_invalid_kind() {
    let (app, _) = app(None);
    let body = json!({
        "type": "",
        "data": {},
        "scope": { "to_user": 1 }
    });

    let response = app
        .oneshot(request(Method::POST, "/internal/dispatch", Some(body)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_ws_without_token_is_unauthorized() {
    let (app, _) = app(None);
    let response = app
        .oneshot(request(Method::GET, "/ws", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ws_with_bad_token_is_unauthorized() {
    let (app, _) = app(None);
    let response = app
        .oneshot(request(Method::GET, "/ws?token=garbage", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stats_reports_connections() {
    let (app, state) = app(None);
    let (_a, _rx) = state.hub.attach(UserId(9));

    let response = app
        .oneshot(request(Method::GET, "/internal/stats", None))
        .await
        .expect("response");
    let stats = json_body(response).await;
    assert_eq!(stats["connections"], 1);
    assert_eq!(stats["metrics"]["connections_registered"], 1);
}
