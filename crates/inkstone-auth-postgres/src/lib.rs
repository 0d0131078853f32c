//! PostgreSQL storage backend for Inkstone session revocation.
//!
//! Persists revocation records in a plain-column `revoked_session` table
//! keyed by token fingerprint, with an expiry index so live-record scans
//! and cleanup stay cheap.
//!
//! # Example
//!
//! ```ignore
//! use inkstone_auth_postgres::PostgresAuthStorage;
//!
//! let storage = PostgresAuthStorage::connect("postgres://localhost/inkstone").await?;
//! storage.revoked_sessions().ensure_schema().await?;
//!
//! // Inject into the revocation service as `Arc<dyn RevocationStore>`.
//! let store = storage.revocation_store();
//! ```

pub mod adapter;
pub mod revoked_session;

use std::sync::Arc;

use sqlx_core::pool::Pool;
use sqlx_postgres::Postgres;

pub use adapter::ArcRevokedSessionStorage;
pub use revoked_session::RevokedSessionStorage;

/// PostgreSQL connection pool type alias.
pub type PgPool = Pool<Postgres>;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during revocation storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx_core::Error),

    /// A stored row could not be interpreted (e.g. a fingerprint column
    /// that is not valid hex).
    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

impl StorageError {
    /// Create an `InvalidRow` error.
    #[must_use]
    pub fn invalid_row(message: impl Into<String>) -> Self {
        Self::InvalidRow(message.into())
    }

    /// Returns `true` if this is a database error.
    #[must_use]
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// Returns `true` if this is an invalid row error.
    #[must_use]
    pub fn is_invalid_row(&self) -> bool {
        matches!(self, Self::InvalidRow(_))
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// PostgreSQL Auth Storage
// =============================================================================

/// PostgreSQL storage backend for authentication data.
///
/// Holds a connection pool and provides access to the revocation record
/// storage, both as borrow-scoped operations and as an Arc-owning store
/// for injection into the revocation service.
#[derive(Debug, Clone)]
pub struct PostgresAuthStorage {
    pool: Arc<PgPool>,
}

impl PostgresAuthStorage {
    /// Create new storage with an existing connection pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create new storage by connecting to the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        use sqlx_core::pool::PoolOptions;
        let pool = PoolOptions::<Postgres>::new().connect(database_url).await?;
        Ok(Self::new(Arc::new(pool)))
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get revoked session storage operations.
    #[must_use]
    pub fn revoked_sessions(&self) -> RevokedSessionStorage<'_> {
        RevokedSessionStorage::new(&self.pool)
    }

    /// Get an Arc-owning revocation store for the service layer.
    #[must_use]
    pub fn revocation_store(&self) -> ArcRevokedSessionStorage {
        ArcRevokedSessionStorage::new(Arc::clone(&self.pool))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_database() {
        let err = StorageError::from(sqlx_core::Error::RowNotFound);
        assert!(err.is_database_error());
        assert!(!err.is_invalid_row());
    }

    #[test]
    fn test_storage_error_invalid_row() {
        let err = StorageError::invalid_row("fingerprint is not hex");
        assert!(err.is_invalid_row());
        assert_eq!(err.to_string(), "Invalid row: fingerprint is not hex");
    }
}
