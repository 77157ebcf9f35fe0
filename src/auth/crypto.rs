//! # Cryptographic Utilities
//!
//! Password hashing for administrator credentials.
//!
//! ## Invariants
//! - Passwords only stored as Argon2id hashes
//! - Plaintext never crosses a persistence boundary

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::errors::{AuthError, AuthResult};

/// Hash a password using Argon2id with a fresh random salt
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::HashingFailed)
}

/// Verify a password against its hash
///
/// Uses constant-time comparison internally (via argon2 crate).
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
