//! # inkstone-auth
//!
//! Session-token revocation ("blacklist") service for the Inkstone
//! publishing platform.
//!
//! The platform's authentication middleware calls [`RevocationService::is_revoked`]
//! on every authenticated request, and [`RevocationService::revoke`] on
//! logout or administrative revocation. Millions of membership checks
//! must stay cheap, a revocation must take effect immediately, and
//! expired revocations must be purged without unbounded memory growth.
//!
//! ## How it works
//!
//! - Raw tokens are reduced to a one-way [`TokenFingerprint`] so they are
//!   never persisted.
//! - A [`RevocationStore`] backend (e.g. `inkstone-auth-postgres`) is the
//!   durable source of truth and survives restarts.
//! - An in-process [`RevocationCache`] answers the hot path with a single
//!   atomic load; misses fall through to the store and repopulate it.
//! - The [`EvictionScheduler`] periodically deletes expired records and
//!   rebuilds the cache from the survivors.
//!
//! ## Wiring
//!
//! One service instance is created at startup and injected into the
//! middleware; the scheduler is started alongside it:
//!
//! ```ignore
//! use std::sync::Arc;
//! use inkstone_auth::{RevocationConfig, RevocationService};
//! use inkstone_auth_postgres::PostgresAuthStorage;
//!
//! let storage = PostgresAuthStorage::connect(&database_url).await?;
//! let config = RevocationConfig::default();
//! config.validate()?;
//!
//! let revocation = Arc::new(RevocationService::new(
//!     Arc::new(storage.revocation_store()),
//!     config,
//! ));
//! let scheduler_shutdown = revocation.scheduler().start();
//!
//! // ... hand `revocation` to the auth middleware ...
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod scheduler;
pub mod service;
pub mod storage;

pub use cache::RevocationCache;
pub use config::RevocationConfig;
pub use error::{AuthError, AuthResult};
pub use fingerprint::{FINGERPRINT_LEN, TokenFingerprint};
pub use scheduler::EvictionScheduler;
pub use service::{RevocationService, RevocationStats};
pub use storage::{RevocationStore, RevokedSession};
