//! # Sync Errors
//!
//! Error taxonomy for the sync protocol. Every variant is caught at the
//! request boundary and translated to a JSON error body; none crash the
//! process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::db::DbError;

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync protocol errors
#[derive(Debug, Error)]
pub enum SyncError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Malformed or missing required input; no database access occurred
    #[error("{0}")]
    Validation(String),

    /// Stale write: the stored stamp is at or past the submitted one
    #[error("a more recent update already exists")]
    Conflict,

    /// Target row absent, or stats table empty
    #[error("{0}")]
    NotFound(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Database-layer failure; the enclosing transaction rolled back
    #[error("{0}")]
    Persistence(#[from] DbError),
}

impl SyncError {
    /// Validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        SyncError::Validation(msg.into())
    }

    /// Not-found error with context
    pub fn not_found(msg: impl Into<String>) -> Self {
        SyncError::NotFound(msg.into())
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SyncError::Validation(_) => StatusCode::BAD_REQUEST,
            SyncError::Conflict => StatusCode::CONFLICT,
            SyncError::NotFound(_) => StatusCode::NOT_FOUND,
            SyncError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for SyncError {
    fn from(err: rusqlite::Error) -> Self {
        SyncError::Persistence(DbError::Sql(err))
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&SyncError> for ErrorResponse {
    fn from(err: &SyncError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code().as_u16(),
        }
    }
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
