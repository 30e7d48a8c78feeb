//! Sync HTTP Routes
//!
//! Endpoints for the change-sync protocol: delta export, optimistic
//! update, and allocated insert.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbPool};
use crate::model::{epoch, parse_sync_bound, StockExport};
use crate::sync::{self, StockInsert, StockUpdate, SyncError};

// ==================
// Shared State
// ==================

/// State shared across all route modules
pub struct SyncState {
    pub pool: DbPool,
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct ChangesQuery {
    #[serde(default)]
    pub last_sync_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================
// Sync Routes
// ==================

/// Create sync routes
pub fn sync_routes(state: Arc<SyncState>) -> Router {
    Router::new()
        .route("/rrhe", get(full_export_handler))
        .route("/rrhe/changes", get(changes_handler))
        .route("/rrhe/update", post(update_handler))
        .route("/rrhe/insert", post(insert_handler))
        .with_state(state)
}

/// Run a blocking controller call on the worker pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, SyncError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SyncError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SyncError::Persistence(DbError::Worker(e.to_string())))?
}

// ==================
// Handlers
// ==================

async fn changes_handler(
    State(state): State<Arc<SyncState>>,
    Query(query): Query<ChangesQuery>,
) -> Result<Response, SyncError> {
    let raw = query
        .last_sync_time
        .ok_or_else(|| SyncError::validation("missing last_sync_time parameter"))?;
    let since = parse_sync_bound(&raw).ok_or_else(|| {
        SyncError::validation("invalid last_sync_time, expected ISO-8601 date-time")
    })?;
    stream_response(&state.pool, since).await
}

async fn full_export_handler(State(state): State<Arc<SyncState>>) -> Result<Response, SyncError> {
    stream_response(&state.pool, epoch()).await
}

async fn stream_response(pool: &DbPool, since: NaiveDateTime) -> Result<Response, SyncError> {
    let body = sync::export_body(pool, since).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response())
}

async fn update_handler(
    State(state): State<Arc<SyncState>>,
    Json(req): Json<StockUpdate>,
) -> Result<Json<MessageResponse>, SyncError> {
    let pool = state.pool.clone();
    run_blocking(move || sync::update_stock(&pool, &req)).await?;
    Ok(Json(MessageResponse {
        message: "stock updated successfully".to_string(),
    }))
}

async fn insert_handler(
    State(state): State<Arc<SyncState>>,
    Json(req): Json<StockInsert>,
) -> Result<(StatusCode, Json<StockExport>), SyncError> {
    let pool = state.pool.clone();
    let stored = run_blocking(move || sync::insert_stock(&pool, &req)).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
