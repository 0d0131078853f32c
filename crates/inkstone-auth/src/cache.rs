//! In-process membership cache of revoked fingerprints.
//!
//! The cache exists so the hot path of `is_revoked` never touches the
//! durable store: `contains` is a single atomic pointer load. The set is
//! a subset, possibly stale, of the non-expired fingerprints in the store.
//! A missing entry is safe (the check falls through to the store); a
//! stale-present entry would not be, so expired fingerprints are removed
//! by replacing the whole set during the scheduler's rebuild rather than
//! by any per-entry eviction policy.

use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::fingerprint::TokenFingerprint;

/// Lock-free membership set of currently-known-revoked fingerprints.
///
/// Reads (`contains`) never block and never suspend. Writes go through
/// `insert` (copy-on-write, for the rare revoke path) or `replace_all`
/// (atomic whole-set swap, for the scheduler's rebuild). Readers never
/// observe a partially-rebuilt set.
pub struct RevocationCache {
    inner: ArcSwap<HashSet<TokenFingerprint>>,
}

impl RevocationCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(HashSet::new()),
        }
    }

    /// Returns `true` if the fingerprint is in the set.
    ///
    /// Single atomic load; this is the entire fast path of a revocation
    /// check.
    #[must_use]
    pub fn contains(&self, fingerprint: &TokenFingerprint) -> bool {
        self.inner.load().contains(fingerprint)
    }

    /// Adds a single fingerprint.
    ///
    /// Copy-on-write: revocations are rare next to membership checks, so
    /// cloning the set keeps `contains` lock-free.
    pub fn insert(&self, fingerprint: &TokenFingerprint) {
        self.inner.rcu(|current| {
            let mut next = HashSet::clone(current);
            next.insert(fingerprint.clone());
            next
        });
    }

    /// Atomically replaces the entire set.
    ///
    /// An `insert` racing this swap may be overwritten; the store is
    /// consulted on every cache miss, so such an entry self-heals on the
    /// next check.
    pub fn replace_all(&self, fingerprints: HashSet<TokenFingerprint>) {
        self.inner.store(Arc::new(fingerprints));
    }

    /// Number of fingerprints currently in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.load().is_empty()
    }
}

impl Default for RevocationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RevocationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevocationCache")
            .field("len", &self.len())
            .finish()
    }
}
