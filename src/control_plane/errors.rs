//! # Control Plane Errors
//!
//! Domain outcomes (bad password, expired token, unknown bundle) become
//! [`Reply`](super::Reply)s; only failures the machine cannot convert to
//! a user-facing message surface here, and of those only storage errors
//! are fatal to the request.

use thiserror::Error;

use crate::auth::AuthError;
use crate::registry::RegistryError;

/// Result type for control-plane operations
pub type ControlPlaneResult<T> = Result<T, ControlPlaneError>;

/// Control-plane errors
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Conversation state store failed
    #[error("Session state error: {0}")]
    State(String),
}
