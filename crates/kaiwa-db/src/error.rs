//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Uniqueness or exclusion constraint rejected the write
    #[error("conflicting write")]
    Conflict,

    /// Stored value could not be decoded into a domain type
    #[error("corrupt row: {0}")]
    Decode(String),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

impl From<kaiwa_types::ParseError> for DbError {
    fn from(err: kaiwa_types::ParseError) -> Self {
        Self::Decode(err.to_string())
    }
}
