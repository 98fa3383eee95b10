// ABOUTME: Error types for the storage layer
// ABOUTME: Shared across user and API key storage operations

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Invalid API key type: {0}")]
    InvalidKeyType(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// True when the underlying database error is a UNIQUE constraint
    /// violation. Used to arbitrate concurrent first-time sign-ins.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StorageError::Sqlx(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}
