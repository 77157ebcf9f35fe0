//! # Session Authority
//!
//! Signed, time-bounded proof that an administrator authenticated.
//!
//! ## Invariants
//! - Stateless validation (no store lookup)
//! - A token is accepted only if its signature verifies and
//!   `valid_until` is strictly greater than the caller's `now`
//! - Malformed input is a routine `Err`, never a panic

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Expiry timestamp (unix epoch seconds)
    pub valid_until: i64,
}

/// Issues and validates session tokens with a process-wide secret.
///
/// The keys are built once at startup and are read-only afterwards; every
/// conversation shares the same authority.
#[derive(Clone)]
pub struct SessionAuthority {
    ttl_seconds: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionAuthority {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token valid until `now + ttl`
    pub fn issue(&self, now: i64) -> AuthResult<String> {
        let claims = SessionClaims {
            valid_until: now + self.ttl_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Validate a token against the caller's `now`.
    ///
    /// Expiry is checked against the `valid_until` claim rather than the
    /// library's wall clock, so validation stays deterministic under test.
    /// Every failure mode maps to a token-error variant; callers treat
    /// them as one denied outcome.
    pub fn validate(&self, token: &str, now: i64) -> AuthResult<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })?;

        if data.claims.valid_until <= now {
            return Err(AuthError::TokenExpired);
        }

        Ok(data.claims)
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }
}
