//! Revocation service.
//!
//! Orchestrates revoke/check operations across the fingerprinter, the
//! durable store, and the membership cache. One instance is created at
//! process start and injected into the platform's authentication
//! middleware; the cache is owned by the service, never shared as
//! process-wide state.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::cache::RevocationCache;
use crate::config::RevocationConfig;
use crate::error::{AuthError, AuthResult};
use crate::fingerprint::TokenFingerprint;
use crate::scheduler::EvictionScheduler;
use crate::storage::{RevocationStore, RevokedSession};

/// Snapshot of service counters. Observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevocationStats {
    /// Successful `revoke` calls since startup.
    pub revocations: u64,
    /// Checks answered from the cache alone.
    pub cache_hits: u64,
    /// Checks that fell through to the store.
    pub cache_misses: u64,
    /// Checks whose store lookup failed and were answered fail-closed.
    pub failed_checks: u64,
    /// Current size of the membership cache.
    pub cache_size: usize,
}

/// Session-token revocation service.
///
/// `revoke` persists a revocation and makes it effective immediately;
/// `is_revoked` answers membership checks, from memory whenever possible.
/// The membership cache only ever holds fingerprints that were backed by
/// a live store record at the moment they were inserted.
pub struct RevocationService {
    store: Arc<dyn RevocationStore>,
    cache: Arc<RevocationCache>,
    config: RevocationConfig,
    revocations: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    failed_checks: AtomicU64,
}

impl RevocationService {
    /// Creates a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn RevocationStore>, config: RevocationConfig) -> Self {
        Self {
            store,
            cache: Arc::new(RevocationCache::new()),
            config,
            revocations: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            failed_checks: AtomicU64::new(0),
        }
    }

    /// Builds the eviction scheduler for this service.
    ///
    /// The scheduler shares this service's store and cache, so exactly
    /// one membership set exists per service instance.
    #[must_use]
    pub fn scheduler(&self) -> EvictionScheduler {
        EvictionScheduler::new(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            self.config.clone(),
        )
    }

    /// Revokes a session token until `expires_at`.
    ///
    /// The store write happens first; the cache is only updated after the
    /// write succeeds, so no cache entry ever exists without store
    /// backing. Callers must not assume the token is revoked unless this
    /// returns `Ok`.
    ///
    /// Re-revoking an already-revoked, unexpired token is an idempotent
    /// no-op: `insert_if_absent` leaves the existing record's expiry and
    /// reason untouched rather than extending them.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for an empty token, or a storage
    /// error (including timeout) if the record could not be persisted.
    pub async fn revoke(
        &self,
        raw_token: &str,
        expires_at: OffsetDateTime,
        reason: &str,
    ) -> AuthResult<()> {
        if raw_token.is_empty() {
            return Err(AuthError::invalid_token("empty session token"));
        }

        let fingerprint = TokenFingerprint::compute(raw_token);
        let record = RevokedSession::new(fingerprint.clone(), expires_at, reason);

        let inserted = self
            .store_call(
                "insert_if_absent",
                self.store.insert_if_absent(&record),
            )
            .await?;

        // A token revoked with an expiry already in the past has no live
        // store record, so caching it would break the subset invariant.
        if record.is_live(record.created_at) {
            self.cache.insert(&fingerprint);
        }
        self.revocations.fetch_add(1, Ordering::Relaxed);

        if inserted {
            debug!(fingerprint = %fingerprint, reason, "Session token revoked");
        } else {
            debug!(fingerprint = %fingerprint, "Session token already revoked");
        }
        Ok(())
    }

    /// Returns `true` if the token has been revoked and the revocation is
    /// still in force.
    ///
    /// Fast path: a cache hit answers without suspending. On a miss the
    /// store is consulted, and a confirmed-live record repopulates the
    /// cache so the next check stays in memory.
    ///
    /// This method never fails: a store error or timeout during the
    /// lookup is answered **fail-closed** (treated as revoked), because
    /// treating an unverifiable token as valid would defeat the purpose
    /// of revocation.
    pub async fn is_revoked(&self, raw_token: &str) -> bool {
        let fingerprint = TokenFingerprint::compute(raw_token);

        if self.cache.contains(&fingerprint) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return true;
        }
        self.cache_misses.fetch_add(1, Ordering::Relaxed);

        let now = OffsetDateTime::now_utc();
        match self
            .store_call("find_live", self.store.find_live(&fingerprint, now))
            .await
        {
            Ok(Some(_)) => {
                self.cache.insert(&fingerprint);
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.failed_checks.fetch_add(1, Ordering::Relaxed);
                warn!(
                    error = %e,
                    fingerprint = %fingerprint,
                    "Revocation lookup failed, failing closed"
                );
                true
            }
        }
    }

    /// Returns a snapshot of the service counters.
    #[must_use]
    pub fn stats(&self) -> RevocationStats {
        RevocationStats {
            revocations: self.revocations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            failed_checks: self.failed_checks.load(Ordering::Relaxed),
            cache_size: self.cache.len(),
        }
    }

    /// Bounds a store call by the configured timeout.
    async fn store_call<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = AuthResult<T>>,
    ) -> AuthResult<T> {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::timeout(operation)),
        }
    }
}

impl std::fmt::Debug for RevocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevocationService")
            .field("cache_size", &self.cache.len())
            .finish()
    }
}
