//! # Auth Errors
//!
//! Error types for the credential-check module.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::db::DbError;
use crate::sync::ErrorResponse;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Required credential fields absent from the request
    #[error("username and password are required")]
    MissingCredentials,

    /// Unknown user or wrong password (deliberately not distinguished)
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Target user absent (token registration)
    #[error("no user named {0}")]
    UserNotFound(String),

    /// Username already taken (CLI user creation)
    #[error("user {0} already exists")]
    UserExists(String),

    /// Database-layer failure
    #[error("{0}")]
    Persistence(#[from] DbError),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AuthError::UserExists(_) => StatusCode::CONFLICT,
            AuthError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for AuthError {
    fn from(err: rusqlite::Error) -> Self {
        AuthError::Persistence(DbError::Sql(err))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });
        (status, body).into_response()
    }
}
