//! Photo-Callback HTTP Route
//!
//! The file relay posts here after storing or deleting a photo. It derives
//! identifiers from filenames, so both arrive as strings; the wire helpers
//! accept either shape.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use super::sync_routes::{run_blocking, MessageResponse, SyncState};
use crate::model::wire;
use crate::sync::{self, SyncError};

#[derive(Debug, Deserialize)]
pub struct PhotoColumnRequest {
    #[serde(rename = "stockID", default, deserialize_with = "wire::opt_id_from_any")]
    pub stock_id: Option<i64>,
    #[serde(rename = "photoIndex", default, deserialize_with = "wire::opt_id_from_any")]
    pub photo_index: Option<i64>,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
}

/// Create the photo-callback route
pub fn photo_routes(state: Arc<SyncState>) -> Router {
    Router::new()
        .route("/update_photo_column", post(update_photo_column_handler))
        .with_state(state)
}

async fn update_photo_column_handler(
    State(state): State<Arc<SyncState>>,
    Json(req): Json<PhotoColumnRequest>,
) -> Result<Json<MessageResponse>, SyncError> {
    let stock_id = req
        .stock_id
        .ok_or_else(|| SyncError::validation("stockID and photoIndex are required"))?;
    let photo_index = req
        .photo_index
        .ok_or_else(|| SyncError::validation("stockID and photoIndex are required"))?;

    let pool = state.pool.clone();
    let photo_url = req.photo_url;
    run_blocking(move || sync::set_photo_url(&pool, stock_id, photo_index, photo_url.as_deref()))
        .await?;

    Ok(Json(MessageResponse {
        message: format!("Photo{} updated successfully for StockID {}", photo_index, stock_id),
    }))
}
