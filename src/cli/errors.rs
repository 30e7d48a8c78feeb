//! CLI-specific error types
//!
//! All CLI errors are fatal; main prints them and exits non-zero.

use thiserror::Error;

use crate::auth::AuthError;
use crate::db::DbError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file error
    #[error("config error: {0}")]
    Config(String),

    /// Bad command input
    #[error("{0}")]
    InvalidInput(String),

    /// Database failure during boot or tooling
    #[error("{0}")]
    Db(#[from] DbError),

    /// User management failure
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// I/O failure (stdin/stdout, sockets)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::Config("missing db_path".to_string());
        assert_eq!(err.to_string(), "config error: missing db_path");
    }
}
