// HTTP transport adapters: SSE, WebSocket and status endpoints

pub mod sse;
pub mod status;
pub mod websocket;

use crate::broker::BrokerHandle;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

pub use sse::sse_handler;
pub use websocket::ws_handler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub broker: BrokerHandle,
    /// Interval between SSE keep-alive comments
    pub keep_alive: Duration,
}

/// Create router with all streaming and status endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/sse", get(sse_handler))
        .route("/api/ws", get(ws_handler))
        .route("/api/hello", get(status::hello))
        .route("/api/stats", get(status::stats))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
