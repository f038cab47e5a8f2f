//! Custom error types for the common library
//!
//! This module defines the database error type shared by the services.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while creating the schema
    #[error("Database schema error: {0}")]
    Schema(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// True when the failure is a PostgreSQL unique-constraint violation.
    ///
    /// Concurrent inserts of the same join row end up here.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Query(SqlxError::Database(db_error)) => db_error.is_unique_violation(),
            _ => false,
        }
    }

    /// Name of the violated foreign key, when the failure is one.
    ///
    /// PostgreSQL names them `<table>_<column>_fkey` unless told otherwise.
    pub fn violated_foreign_key(&self) -> Option<&str> {
        match self {
            DatabaseError::Query(SqlxError::Database(db_error))
                if db_error.is_foreign_key_violation() =>
            {
                Some(db_error.constraint().unwrap_or_default())
            }
            _ => None,
        }
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(error: SqlxError) -> Self {
        DatabaseError::Query(error)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
