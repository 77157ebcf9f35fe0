//! # Registry Errors

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Bundle registry errors
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Bundle not found
    #[error("Bundle not found")]
    NotFound,

    /// Storage operation failed (the only fatal class)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for RegistryError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => RegistryError::NotFound,
            other => RegistryError::Storage(other.to_string()),
        }
    }
}
