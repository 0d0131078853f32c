//! Eviction scheduler.
//!
//! A recurring background task that purges expired revocation records
//! from the durable store and rebuilds the membership cache from the
//! survivors. Both steps are best-effort: a missed cycle is tolerable and
//! self-corrects on the next tick, so failures are logged and swallowed,
//! never propagated to the host process.
//!
//! The scheduler is an explicitly started, explicitly stoppable task -
//! never a side effect of importing a module - so tests can drive a
//! single tick deterministically through [`EvictionScheduler::run_once`].

use std::collections::HashSet;
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::{Mutex, watch};
use tokio::time::{interval, timeout};
use tracing::{debug, info, warn};

use crate::cache::RevocationCache;
use crate::config::RevocationConfig;
use crate::storage::RevocationStore;

/// Periodic purge-and-rebuild task over a service's store and cache.
///
/// Obtained from [`RevocationService::scheduler`]; the scheduler and the
/// service operate on the same membership set.
///
/// [`RevocationService::scheduler`]: crate::service::RevocationService::scheduler
pub struct EvictionScheduler {
    store: Arc<dyn RevocationStore>,
    cache: Arc<RevocationCache>,
    config: RevocationConfig,
    tick_lock: Mutex<()>,
}

impl EvictionScheduler {
    pub(crate) fn new(
        store: Arc<dyn RevocationStore>,
        cache: Arc<RevocationCache>,
        config: RevocationConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
            tick_lock: Mutex::new(()),
        }
    }

    /// Runs a single eviction pass.
    ///
    /// 1. Deletes expired records from the store. A failure here is
    ///    logged and does not block step 2.
    /// 2. Rebuilds the membership cache from the live records, swapping
    ///    the whole set atomically. A failure here leaves the previous
    ///    cache contents in place - the cache is never replaced with an
    ///    empty set because a rebuild failed.
    ///
    /// If a previous pass is still running the call is skipped, so two
    /// passes never run concurrently against the same store and cache.
    pub async fn run_once(&self, now: OffsetDateTime) {
        let Ok(_guard) = self.tick_lock.try_lock() else {
            debug!("Eviction pass already running, skipping");
            return;
        };

        match timeout(self.config.store_timeout, self.store.delete_expired(now)).await {
            Ok(Ok(removed)) if removed > 0 => {
                info!(removed, "Purged expired revocation records");
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to purge expired revocation records"),
            Err(_) => warn!("Purging expired revocation records timed out"),
        }

        match timeout(self.config.store_timeout, self.store.list_live(now)).await {
            Ok(Ok(live)) => {
                let fingerprints: HashSet<_> = live.into_iter().collect();
                let size = fingerprints.len();
                self.cache.replace_all(fingerprints);
                debug!(live = size, "Membership cache rebuilt");
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Cache rebuild failed, keeping previous contents");
            }
            Err(_) => warn!("Cache rebuild timed out, keeping previous contents"),
        }
    }

    /// Starts the periodic loop in a background task.
    ///
    /// The interval's first tick completes immediately and serves as the
    /// startup warm-up; when `warm_cache_on_start` is disabled that tick
    /// is consumed without running a pass.
    ///
    /// Returns a shutdown sender; send `true` (or drop it) to stop the
    /// scheduler.
    pub fn start(self) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            info!(
                interval = ?self.config.cleanup_interval,
                "Eviction scheduler started"
            );

            let mut ticker = interval(self.config.cleanup_interval);
            if !self.config.warm_cache_on_start {
                ticker.tick().await;
            }

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.run_once(OffsetDateTime::now_utc()).await;
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!("Eviction scheduler shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }
}

impl std::fmt::Debug for EvictionScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvictionScheduler")
            .field("cleanup_interval", &self.config.cleanup_interval)
            .finish()
    }
}
