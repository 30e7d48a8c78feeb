//! Stats and Health HTTP Routes

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::sync_routes::{run_blocking, SyncState};
use crate::model::StatsExport;
use crate::sync::{self, SyncError};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Create the stats route
pub fn stats_routes(state: Arc<SyncState>) -> Router {
    Router::new()
        .route("/stats", get(stats_handler))
        .with_state(state)
}

/// Create the health route
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn stats_handler(
    State(state): State<Arc<SyncState>>,
) -> Result<Json<Vec<StatsExport>>, SyncError> {
    let pool = state.pool.clone();
    let stats = run_blocking(move || sync::read_stats(&pool)).await?;
    Ok(Json(stats))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
