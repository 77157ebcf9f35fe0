//! Shared SQLite store
//!
//! Both long-running surfaces (gate and control plane) open the same
//! database; correctness under concurrent access comes from the store's
//! own atomicity (unique constraints + single-statement upserts), never
//! from in-process locks.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open (creating if missing) the database at `url` and return a pool.
///
/// WAL mode plus a busy timeout lets the gate and the control plane write
/// concurrently without surfacing SQLITE_BUSY to callers.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
}

/// Open a private in-memory database (single connection, ephemeral).
///
/// Used by tests and throwaway runs; a pooled in-memory database must be
/// capped at one connection or every connection sees its own empty store.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// Create the two tables if they do not exist.
///
/// `bundle_id` and `login` carry UNIQUE constraints; the registry's
/// check-or-create upsert relies on the former to serialize first contact.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS administrators (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            login    TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS bundles (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            bundle_id        TEXT NOT NULL UNIQUE,
            allow_execution  INTEGER NOT NULL,
            last_access_time INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
