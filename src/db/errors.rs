//! # Database Errors
//!
//! Error types for the database adapter.

use thiserror::Error;

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Database adapter errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to open or configure a connection
    #[error("failed to open database: {0}")]
    Connection(String),

    /// SQL execution failure
    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// Stored data that violates the schema's invariants
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// Worker thread running a database operation died
    #[error("database worker failed: {0}")]
    Worker(String),
}

impl DbError {
    /// Corrupt-row error with context
    pub fn corrupt(msg: impl Into<String>) -> Self {
        DbError::Corrupt(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DbError::Connection("no such directory".to_string());
        assert_eq!(err.to_string(), "failed to open database: no such directory");

        let err = DbError::corrupt("stock 7 has unparseable stamp");
        assert_eq!(err.to_string(), "corrupt row: stock 7 has unparseable stamp");
    }
}
