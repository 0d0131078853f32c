//! Arc-owning store adapter for the revocation service.
//!
//! The lifetime-based [`RevokedSessionStorage`] borrows the pool; this
//! wrapper owns an `Arc<PgPool>` so it can be injected into
//! [`RevocationService`] as an `Arc<dyn RevocationStore>`.
//!
//! [`RevokedSessionStorage`]: crate::revoked_session::RevokedSessionStorage
//! [`RevocationService`]: inkstone_auth::RevocationService

use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;

use inkstone_auth::{AuthError, AuthResult, RevocationStore, RevokedSession, TokenFingerprint};

use crate::PgPool;
use crate::revoked_session::RevokedSessionStorage;

/// Arc-owning PostgreSQL revocation store adapter.
#[derive(Clone)]
pub struct ArcRevokedSessionStorage {
    pool: Arc<PgPool>,
}

impl ArcRevokedSessionStorage {
    /// Create a new Arc-owning revocation store.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevocationStore for ArcRevokedSessionStorage {
    async fn insert_if_absent(&self, record: &RevokedSession) -> AuthResult<bool> {
        let storage = RevokedSessionStorage::new(&self.pool);
        storage
            .insert_if_absent(record)
            .await
            .map_err(|e| AuthError::storage(e.to_string()))
    }

    async fn find_live(
        &self,
        fingerprint: &TokenFingerprint,
        now: OffsetDateTime,
    ) -> AuthResult<Option<RevokedSession>> {
        let storage = RevokedSessionStorage::new(&self.pool);
        storage
            .find_live(fingerprint, now)
            .await
            .map_err(|e| AuthError::storage(e.to_string()))
    }

    async fn list_live(&self, now: OffsetDateTime) -> AuthResult<Vec<TokenFingerprint>> {
        let storage = RevokedSessionStorage::new(&self.pool);
        storage
            .list_live(now)
            .await
            .map_err(|e| AuthError::storage(e.to_string()))
    }

    async fn delete_expired(&self, now: OffsetDateTime) -> AuthResult<u64> {
        let storage = RevokedSessionStorage::new(&self.pool);
        storage
            .delete_expired(now)
            .await
            .map_err(|e| AuthError::storage(e.to_string()))
    }

    async fn count(&self) -> AuthResult<u64> {
        let storage = RevokedSessionStorage::new(&self.pool);
        let count = storage
            .count()
            .await
            .map_err(|e| AuthError::storage(e.to_string()))?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_adapter_is_injectable() {
        use sqlx_core::pool::PoolOptions;

        fn assert_store(_store: Arc<dyn RevocationStore>) {}

        let pool = PoolOptions::<sqlx_postgres::Postgres>::new()
            .connect_lazy("postgres://localhost/inkstone")
            .unwrap();
        assert_store(Arc::new(ArcRevokedSessionStorage::new(Arc::new(pool))));
    }
}
