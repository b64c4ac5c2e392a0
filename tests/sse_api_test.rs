// Integration tests for the HTTP transport adapters
//
// Requests go through the full router with tower::ServiceExt::oneshot. SSE
// bodies are read frame by frame from the response body stream; dropping the
// response stands in for the client hanging up.

use axum::{
    body::{to_bytes, Body, BodyDataStream},
    http::{header, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use herald::{
    api::{create_router, AppState},
    broker::{BrokerHandle, BrokerOptions},
    event::TickEvent,
    world::World,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tower::ServiceExt;

fn make_app() -> (Router, BrokerHandle) {
    let broker = BrokerHandle::spawn(BrokerOptions::default(), Arc::new(World::new(500, 500)));
    let app = create_router(AppState {
        broker: broker.clone(),
        keep_alive: Duration::from_secs(15),
    });
    (app, broker)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn sse_request() -> Request<Body> {
    Request::builder()
        .uri("/api/sse")
        .header(header::ACCEPT, "text/event-stream")
        .body(Body::empty())
        .unwrap()
}

async fn next_frame(frames: &mut BodyDataStream) -> String {
    let chunk = timeout(Duration::from_secs(2), frames.next())
        .await
        .expect("timed out waiting for frame")
        .expect("stream ended")
        .unwrap();
    String::from_utf8(chunk.to_vec()).unwrap()
}

async fn json_body(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ── Status endpoints ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_hello() {
    let (app, _broker) = make_app();
    let resp = app.oneshot(get_request("/api/hello")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp.into_body()).await, json!({"message": "hello"}));
}

#[tokio::test]
async fn test_stats_reports_membership() {
    let (app, broker) = make_app();
    let _sub = broker.subscribe().await.unwrap();

    let resp = app.oneshot(get_request("/api/stats")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp.into_body()).await;
    assert_eq!(body["clients"], 1);
    assert_eq!(body["entities"], 0);
    assert_eq!(body["connectionsTotal"], 1);
    assert_eq!(body["ticksPublished"], 0);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _broker) = make_app();
    let req = Request::builder()
        .uri("/api/hello")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

// ── SSE transport ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sse_refused_when_streaming_not_accepted() {
    let (app, broker) = make_app();
    let req = Request::builder()
        .uri("/api/sse")
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp.into_body()).await;
    assert_eq!(body["error"], "Streaming unsupported!");

    // Refused before registering
    assert_eq!(broker.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_sse_stream_announces_then_streams_positions() {
    let (app, broker) = make_app();
    let resp = app.oneshot(sse_request()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let mut frames = resp.into_body().into_data_stream();

    let first = next_frame(&mut frames).await;
    assert!(first.contains("newConnection"), "got {:?}", first);
    assert!(first.contains("\"id\""));

    let second = next_frame(&mut frames).await;
    assert!(second.contains("numClients"), "got {:?}", second);
    assert!(second.contains("{\"numClients\":1}"));

    broker.publish(TickEvent::new("tick-1")).await.unwrap();
    let third = next_frame(&mut frames).await;
    assert!(third.contains("\"type\":\"position\""), "got {:?}", third);
    assert!(third.contains("\"time\":\"tick-1\""));
    // Position updates use the default (unnamed) event
    assert!(!third.contains("event:"));
}

#[tokio::test]
async fn test_sse_disconnect_unsubscribes() {
    let (app, broker) = make_app();
    let resp = app.oneshot(sse_request()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(broker.count().await.unwrap(), 1);

    // Client hangs up: the body (and its subscription) is dropped
    drop(resp);
    assert_eq!(broker.count().await.unwrap(), 0);
}

// ── WebSocket transport ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_ws_requires_upgrade() {
    let (app, broker) = make_app();
    let resp = app.oneshot(get_request("/api/ws")).await.unwrap();
    // Plain GET is not a WebSocket handshake; nothing gets registered
    assert!(resp.status().is_client_error());
    assert_eq!(broker.count().await.unwrap(), 0);
}
