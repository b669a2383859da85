//! Task store error types.

use thiserror::Error;

/// Errors that can occur during task store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid store configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The backing store could not be reached or rejected a command.
    #[error("store connection error: {0}")]
    Connection(String),

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal failure (poisoned state, invalid time arithmetic).
    #[error("internal store error: {0}")]
    Internal(String),

    /// Pagination arguments out of range.
    #[error("invalid page {page} with page size {page_size} (both must be at least 1)")]
    InvalidPage { page: usize, page_size: usize },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Connection(err.to_string())
    }
}

/// Result type for task store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
