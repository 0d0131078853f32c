//! Durable store contract for revocation records.
//!
//! The store is the source of truth for revocations: it survives process
//! restarts and is always consulted on a cache miss. The revocation core
//! only defines the access contract; concrete backends live in separate
//! crates.
//!
//! # Implementations
//!
//! - `inkstone-auth-postgres` - PostgreSQL storage backend
//!
//! Expiry-sensitive operations take `now` as an explicit parameter so the
//! semantics are testable without clock control.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AuthResult;
use crate::fingerprint::TokenFingerprint;

/// A persisted revocation record.
///
/// Records are immutable once written: re-revoking the same fingerprint
/// is an idempotent no-op and never changes `expires_at` or `reason`.
/// After `expires_at` the record is semantically void even while still
/// physically present, and the eviction scheduler eventually deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokedSession {
    /// One-way derived identifier of the revoked session token.
    pub fingerprint: TokenFingerprint,

    /// Free-form classification of the revocation ("logout",
    /// "admin-revoke", "password-change"). Informational only.
    pub reason: String,

    /// When the record was created. Observability only.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the underlying session token naturally expires. After this
    /// instant the record is treated as absent for membership purposes.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl RevokedSession {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(
        fingerprint: TokenFingerprint,
        expires_at: OffsetDateTime,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            fingerprint,
            reason: reason.into(),
            created_at: OffsetDateTime::now_utc(),
            expires_at,
        }
    }

    /// Returns `true` if the record is expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }

    /// Returns `true` if the record is still in force at `now`.
    #[must_use]
    pub fn is_live(&self, now: OffsetDateTime) -> bool {
        !self.is_expired(now)
    }
}

/// Storage trait for revocation records.
///
/// # Example Implementation
///
/// ```ignore
/// use inkstone_auth::{AuthResult, RevocationStore, RevokedSession, TokenFingerprint};
/// use time::OffsetDateTime;
///
/// struct InMemoryStore {
///     records: std::sync::RwLock<std::collections::HashMap<TokenFingerprint, RevokedSession>>,
/// }
///
/// #[async_trait::async_trait]
/// impl RevocationStore for InMemoryStore {
///     async fn insert_if_absent(&self, record: &RevokedSession) -> AuthResult<bool> {
///         let mut records = self.records.write().unwrap();
///         if records.contains_key(&record.fingerprint) {
///             return Ok(false);
///         }
///         records.insert(record.fingerprint.clone(), record.clone());
///         Ok(true)
///     }
///     // ... other methods
/// }
/// ```
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Persists a revocation record unless one already exists for the
    /// same fingerprint.
    ///
    /// Never overwrites: revoking an already-revoked fingerprint leaves
    /// the existing record (and its expiry) untouched.
    ///
    /// # Returns
    ///
    /// `true` if a new record was created, `false` if one was already
    /// present.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn insert_if_absent(&self, record: &RevokedSession) -> AuthResult<bool>;

    /// Looks up the record for a fingerprint, filtering out expired ones.
    ///
    /// Returns the record only if `expires_at > now`; an expired record
    /// is reported as absent even while still physically present.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_live(
        &self,
        fingerprint: &TokenFingerprint,
        now: OffsetDateTime,
    ) -> AuthResult<Option<RevokedSession>>;

    /// Lists every fingerprint whose record is still live at `now`.
    ///
    /// Feeds the membership cache rebuild, so implementations should keep
    /// this a single indexed scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list_live(&self, now: OffsetDateTime) -> AuthResult<Vec<TokenFingerprint>>;

    /// Deletes every record with `expires_at <= now`.
    ///
    /// # Returns
    ///
    /// The number of records removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleanup operation fails.
    async fn delete_expired(&self, now: OffsetDateTime) -> AuthResult<u64>;

    /// Total number of records, live or expired. Monitoring only.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn count(&self) -> AuthResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[test]
    fn test_expiry_boundary() {
        let now = OffsetDateTime::now_utc();
        let record = RevokedSession::new(TokenFingerprint::compute("abc"), now, "logout");

        // A record expiring exactly at `now` is already void.
        assert!(record.is_expired(now));
        assert!(record.is_live(now - Duration::seconds(1)));
        assert!(!record.is_live(now + Duration::seconds(1)));
    }

    #[test]
    fn test_record_serde_round_trip() {
        let now = OffsetDateTime::now_utc();
        let record = RevokedSession::new(
            TokenFingerprint::compute("abc"),
            now + Duration::hours(1),
            "admin-revoke",
        );

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("expiresAt"));
        assert!(json.contains("admin-revoke"));

        let back: RevokedSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fingerprint, record.fingerprint);
        assert_eq!(back.reason, record.reason);
        assert_eq!(back.expires_at, record.expires_at);
    }
}
