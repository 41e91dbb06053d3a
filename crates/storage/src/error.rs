use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the product or order storage.
///
/// A missing product is not an error; lookups report it as `Ok(false)`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The storage call did not finish in time.
    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    /// The storage backend is unavailable.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A value could not be mapped between the domain and its stored form.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StorageError {
    /// Returns true if the error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, StorageError::Timeout(_))
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
