//! Revocation record storage for PostgreSQL.
//!
//! Records are stored in a plain-column table rather than as JSON
//! documents: every query filters or deletes on `expires_at`, and the
//! membership-cache rebuild scans the whole live set, so both need real
//! columns and a btree index.

use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;
use sqlx_core::row::Row;
use time::OffsetDateTime;
use tracing::info;

use inkstone_auth::{RevokedSession, TokenFingerprint};

use crate::{PgPool, StorageError, StorageResult};

/// Revocation record storage operations.
pub struct RevokedSessionStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> RevokedSessionStorage<'a> {
    /// Create a new revoked session storage with a connection pool reference.
    #[must_use]
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create the `revoked_session` table and its expiry index if they do
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL statements fail.
    pub async fn ensure_schema(&self) -> StorageResult<()> {
        query(
            r#"
            CREATE TABLE IF NOT EXISTS revoked_session (
                fingerprint TEXT PRIMARY KEY,
                reason      TEXT NOT NULL,
                created_at  TIMESTAMPTZ NOT NULL,
                expires_at  TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(self.pool)
        .await?;

        query(
            r#"
            CREATE INDEX IF NOT EXISTS revoked_session_expires_at_idx
            ON revoked_session (expires_at)
            "#,
        )
        .execute(self.pool)
        .await?;

        info!("Ensured revoked_session table and expiry index");
        Ok(())
    }

    /// Insert a revocation record unless one already exists for the same
    /// fingerprint.
    ///
    /// This operation is idempotent: an existing record is never
    /// overwritten, so re-revoking cannot extend an expiry.
    ///
    /// # Returns
    ///
    /// `true` if a new row was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert_if_absent(&self, record: &RevokedSession) -> StorageResult<bool> {
        let result = query(
            r#"
            INSERT INTO revoked_session (fingerprint, reason, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (fingerprint) DO NOTHING
            "#,
        )
        .bind(record.fingerprint.as_str())
        .bind(&record.reason)
        .bind(record.created_at)
        .bind(record.expires_at)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Find the record for a fingerprint if it is still live at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the stored row is
    /// malformed.
    pub async fn find_live(
        &self,
        fingerprint: &TokenFingerprint,
        now: OffsetDateTime,
    ) -> StorageResult<Option<RevokedSession>> {
        let row = query(
            r#"
            SELECT fingerprint, reason, created_at, expires_at
            FROM revoked_session
            WHERE fingerprint = $1 AND expires_at > $2
            "#,
        )
        .bind(fingerprint.as_str())
        .bind(now)
        .fetch_optional(self.pool)
        .await?;

        row.map(|row| {
            Ok(RevokedSession {
                fingerprint: TokenFingerprint::from_hex(row.try_get::<String, _>("fingerprint")?)
                    .map_err(|e| StorageError::invalid_row(e.to_string()))?,
                reason: row.try_get("reason")?,
                created_at: row.try_get("created_at")?,
                expires_at: row.try_get("expires_at")?,
            })
        })
        .transpose()
    }

    /// List every fingerprint whose record is still live at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a stored
    /// fingerprint is malformed.
    pub async fn list_live(&self, now: OffsetDateTime) -> StorageResult<Vec<TokenFingerprint>> {
        let fingerprints: Vec<String> = query_scalar(
            r#"
            SELECT fingerprint FROM revoked_session WHERE expires_at > $1
            "#,
        )
        .bind(now)
        .fetch_all(self.pool)
        .await?;

        fingerprints
            .into_iter()
            .map(|fp| {
                TokenFingerprint::from_hex(fp)
                    .map_err(|e| StorageError::invalid_row(e.to_string()))
            })
            .collect()
    }

    /// Delete every record with `expires_at <= now`.
    ///
    /// # Returns
    ///
    /// The number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_expired(&self, now: OffsetDateTime) -> StorageResult<u64> {
        let result = query(
            r#"
            DELETE FROM revoked_session WHERE expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Total number of revocation records, live or expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> StorageResult<i64> {
        let count: i64 = query_scalar("SELECT COUNT(*) FROM revoked_session")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    // Query behavior is exercised through the adapter against a real
    // database in deployment; here we only ensure the storage type can be
    // constructed over a lazily-connected pool.
    use super::*;

    #[tokio::test]
    async fn test_storage_creation() {
        use sqlx_core::pool::PoolOptions;
        let pool = PoolOptions::<sqlx_postgres::Postgres>::new()
            .connect_lazy("postgres://localhost/inkstone")
            .unwrap();
        let _storage = RevokedSessionStorage::new(&pool);
    }
}
