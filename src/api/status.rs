use crate::api::AppState;
use crate::broker::StatsSnapshot;
use crate::error::BroadcastError;
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HelloResponse {
    message: String,
}

/// GET /api/hello - liveness check
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "hello".to_string(),
    })
}

#[derive(Serialize)]
pub struct StatsResponse {
    clients: usize,
    entities: usize,
    #[serde(flatten)]
    counters: StatsSnapshot,
}

/// GET /api/stats - current membership and lifetime delivery counters
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, BroadcastError> {
    let clients = state.broker.count().await?;
    Ok(Json(StatsResponse {
        clients,
        entities: state.broker.world().len(),
        counters: state.broker.stats(),
    }))
}
