use crate::api::AppState;
use crate::subscription::ConnectionManager;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use std::sync::Arc;
use tracing::{info, warn};

/// GET /api/ws - WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle WebSocket connection
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let subscription = match state.broker.subscribe().await {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!(error = %e, "Refusing WebSocket connection");
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };

    ConnectionManager::new(subscription).handle(socket).await;
}
