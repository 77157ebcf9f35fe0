//! CLI-specific error types

use thiserror::Error;

use crate::auth::AuthError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors; all are fatal to the invocation
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file error
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error (stdin/stdout, sockets)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credential operation failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Store unreachable or corrupt
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for CliError {
    fn from(e: sqlx::Error) -> Self {
        CliError::Storage(e.to_string())
    }
}
