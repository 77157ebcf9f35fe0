//! # Registry Store
//!
//! All registry mutations are single SQL statements, so each is atomic
//! with respect to every other caller. `check_or_create` in particular is
//! one upsert: two concurrent first contacts for the same unseen id race
//! on the UNIQUE constraint and the loser lands in the update branch.

use sqlx::SqlitePool;

use super::bundle::Bundle;
use super::errors::RegistryResult;
use super::SEARCH_LIMIT;

/// Bundle registry over the shared pool
#[derive(Clone)]
pub struct BundleRegistry {
    pool: SqlitePool,
}

impl BundleRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an authorization check and return the verdict.
    ///
    /// Unseen bundles are inserted as allowed (fail-open) with
    /// `last_access_time = now`; existing rows keep their flag and get
    /// their stamp advanced. The `MAX` guard keeps the stamp monotonic
    /// when concurrent callers carry out-of-order timestamps.
    pub async fn check_or_create(&self, bundle_id: &str, now: i64) -> RegistryResult<bool> {
        let (allowed,): (bool,) = sqlx::query_as(
            "INSERT INTO bundles (bundle_id, allow_execution, last_access_time)
             VALUES (?1, 1, ?2)
             ON CONFLICT(bundle_id) DO UPDATE
             SET last_access_time = MAX(last_access_time, excluded.last_access_time)
             RETURNING allow_execution",
        )
        .bind(bundle_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(allowed)
    }

    /// Set the execution flag, materializing an absent row first.
    ///
    /// A freshly materialized row gets `last_access_time = now`; an
    /// existing row keeps its stamp.
    pub async fn set_execution(
        &self,
        bundle_id: &str,
        allowed: bool,
        now: i64,
    ) -> RegistryResult<()> {
        sqlx::query(
            "INSERT INTO bundles (bundle_id, allow_execution, last_access_time)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(bundle_id) DO UPDATE
             SET allow_execution = excluded.allow_execution",
        )
        .bind(bundle_id)
        .bind(allowed)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a bundle; no-op if absent
    pub async fn remove(&self, bundle_id: &str) -> RegistryResult<()> {
        sqlx::query("DELETE FROM bundles WHERE bundle_id = ?1")
            .bind(bundle_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Total row count plus one page, most recently checked-in first.
    ///
    /// The count is independent of `limit`/`offset`; callers compute the
    /// page count as `ceil(total / limit)`.
    pub async fn list(&self, limit: u32, offset: u32) -> RegistryResult<(u64, Vec<Bundle>)> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bundles")
            .fetch_one(&self.pool)
            .await?;

        if total == 0 {
            return Ok((0, Vec::new()));
        }

        let rows = sqlx::query_as::<_, Bundle>(
            "SELECT id, bundle_id, allow_execution, last_access_time
             FROM bundles
             ORDER BY last_access_time DESC
             LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((total as u64, rows))
    }

    /// Look up one bundle; fails with `NotFound` if absent
    pub async fn get(&self, bundle_id: &str) -> RegistryResult<Bundle> {
        let bundle = sqlx::query_as::<_, Bundle>(
            "SELECT id, bundle_id, allow_execution, last_access_time
             FROM bundles
             WHERE bundle_id = ?1",
        )
        .bind(bundle_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(bundle)
    }

    /// Case-sensitive substring match anywhere in `bundle_id`.
    ///
    /// `instr` rather than LIKE: SQLite's LIKE is case-insensitive for
    /// ASCII and would need pattern escaping.
    pub async fn search(&self, substring: &str, limit: u32) -> RegistryResult<Vec<Bundle>> {
        let rows = sqlx::query_as::<_, Bundle>(
            "SELECT id, bundle_id, allow_execution, last_access_time
             FROM bundles
             WHERE instr(bundle_id, ?1) > 0
             LIMIT ?2",
        )
        .bind(substring)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// `search` with the default row cap
    pub async fn search_default(&self, substring: &str) -> RegistryResult<Vec<Bundle>> {
        self.search(substring, SEARCH_LIMIT).await
    }
}
