//! Auth HTTP Routes
//!
//! Login check and FCM token registration.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use super::sync_routes::{MessageResponse, SyncState};
use crate::auth::{self, AuthError, FcmTokenRequest, LoginRequest, UserIdentity};
use crate::db::DbError;

/// Create auth routes
pub fn auth_routes(state: Arc<SyncState>) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/update_fcm_token", post(update_fcm_token_handler))
        .with_state(state)
}

async fn run_blocking<T, F>(f: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Persistence(DbError::Worker(e.to_string())))?
}

async fn login_handler(
    State(state): State<Arc<SyncState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserIdentity>, AuthError> {
    let pool = state.pool.clone();
    let identity = run_blocking(move || auth::login(&pool, &req)).await?;
    Ok(Json(identity))
}

async fn update_fcm_token_handler(
    State(state): State<Arc<SyncState>>,
    Json(req): Json<FcmTokenRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    let pool = state.pool.clone();
    run_blocking(move || auth::update_fcm_token(&pool, &req)).await?;
    Ok(Json(MessageResponse {
        message: "FCM token updated successfully".to_string(),
    }))
}
