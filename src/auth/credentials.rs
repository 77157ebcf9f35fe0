//! # Credential Store
//!
//! Administrator login/password-hash pairs in the `administrators` table.
//! Created and mutated only through the offline provisioning surface; the
//! chat control plane only ever calls `validate`.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::crypto::{hash_password, verify_password};
use super::errors::{AuthError, AuthResult};

/// Administrator model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Administrator {
    /// Row identifier
    pub id: i64,

    /// Unique login
    pub login: String,

    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

/// Credential store over the shared pool
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an administrator; fails with `DuplicateLogin` if the login
    /// is taken. The UNIQUE constraint backstops a concurrent create.
    pub async fn create(&self, login: &str, password: &str) -> AuthResult<()> {
        let password_hash = hash_password(password)?;

        let result = sqlx::query("INSERT INTO administrators (login, password) VALUES (?1, ?2)")
            .bind(login)
            .bind(&password_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AuthError::DuplicateLogin)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verify a login/password pair.
    ///
    /// Unknown logins return `Ok(false)`, never an error, and still burn
    /// a comparable amount of hashing work so the caller's effort does
    /// not reveal whether the login exists.
    pub async fn validate(&self, login: &str, password: &str) -> AuthResult<bool> {
        let admin = sqlx::query_as::<_, Administrator>(
            "SELECT id, login, password FROM administrators WHERE login = ?1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        match admin {
            Some(admin) => verify_password(password, &admin.password_hash),
            None => {
                let _ = hash_password(password)?;
                Ok(false)
            }
        }
    }

    /// Replace an administrator's password; fails with `NotFound` if the
    /// login is absent.
    pub async fn change_password(&self, login: &str, new_password: &str) -> AuthResult<()> {
        let password_hash = hash_password(new_password)?;

        let result = sqlx::query("UPDATE administrators SET password = ?1 WHERE login = ?2")
            .bind(&password_hash)
            .bind(login)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    /// Remove an administrator; no-op if absent
    pub async fn remove(&self, login: &str) -> AuthResult<()> {
        sqlx::query("DELETE FROM administrators WHERE login = ?1")
            .bind(login)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Check whether a login is registered
    pub async fn exists(&self, login: &str) -> AuthResult<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM administrators WHERE login = ?1")
                .bind(login)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    /// List all administrator logins (provisioning surface)
    pub async fn list_logins(&self) -> AuthResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT login FROM administrators ORDER BY login")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(login,)| login).collect())
    }
}
