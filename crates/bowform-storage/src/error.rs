//! Storage error types.

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failures reading or writing the local stores.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No entry under this key
    #[error("{0} does not exist")]
    NotFound(String),

    /// Key that could escape its directory or was never issued
    #[error("Rejected key {0:?}")]
    InvalidKey(String),

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }

    /// True for the two client-side outcomes: unknown and rejected keys.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidKey(_))
    }
}
