//! # Auth Errors
//!
//! Error types for credential and session-token operations.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Credential Errors
    // ==================
    /// Login/password pair did not verify (generic - don't leak which field)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Provisioning attempted to create an administrator that already exists
    #[error("Login already registered")]
    DuplicateLogin,

    /// Administrator not found
    #[error("Administrator not found")]
    NotFound,

    // ==================
    // Token Errors
    // ==================
    /// Session token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// Session token has expired
    #[error("Token expired")]
    TokenExpired,

    /// Session token signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    // ==================
    // Internal Errors
    // ==================
    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,

    /// Storage operation failed (the only fatal class)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Token-validation failures all collapse to one denied outcome;
    /// callers must not branch on which one occurred.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken | AuthError::TokenExpired | AuthError::InvalidSignature
        )
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_do_not_leak_info() {
        // InvalidCredentials must stay generic
        let err = AuthError::InvalidCredentials;
        assert!(!err.to_string().contains("password"));
        assert!(!err.to_string().contains("login"));
    }

    #[test]
    fn test_token_rejection_classification() {
        assert!(AuthError::MalformedToken.is_token_rejection());
        assert!(AuthError::TokenExpired.is_token_rejection());
        assert!(AuthError::InvalidSignature.is_token_rejection());
        assert!(!AuthError::InvalidCredentials.is_token_rejection());
        assert!(!AuthError::Storage("x".into()).is_token_rejection());
    }
}
