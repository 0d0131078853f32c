//! Revocation service configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Configuration for the revocation service and its eviction scheduler.
///
/// # Example (TOML)
///
/// ```toml
/// [auth.revocation]
/// cleanup_interval = "1h"
/// warm_cache_on_start = true
/// store_timeout = "5s"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RevocationConfig {
    /// How often the eviction scheduler purges expired records and
    /// rebuilds the membership cache.
    #[serde(with = "humantime_serde")]
    pub cleanup_interval: Duration,

    /// Run one eager cleanup/rebuild pass at startup, before the first
    /// periodic tick, so checks are accurate immediately instead of
    /// relying solely on lazy self-healing.
    pub warm_cache_on_start: bool,

    /// Upper bound on every durable-store call. A timed-out revoke is
    /// reported as a failure, never a silent success.
    #[serde(with = "humantime_serde")]
    pub store_timeout: Duration,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(3600), // 1 hour
            warm_cache_on_start: true,
            store_timeout: Duration::from_secs(5),
        }
    }
}

impl RevocationConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if any duration is zero.
    pub fn validate(&self) -> AuthResult<()> {
        if self.cleanup_interval.is_zero() {
            return Err(AuthError::configuration("cleanup_interval must be non-zero"));
        }
        if self.store_timeout.is_zero() {
            return Err(AuthError::configuration("store_timeout must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RevocationConfig::default();
        assert_eq!(config.cleanup_interval, Duration::from_secs(3600));
        assert!(config.warm_cache_on_start);
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_durations() {
        let config = RevocationConfig {
            cleanup_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RevocationConfig {
            store_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_humantime_durations() {
        let config: RevocationConfig = serde_json::from_str(
            r#"{"cleanup_interval": "30m", "warm_cache_on_start": false, "store_timeout": "250ms"}"#,
        )
        .unwrap();
        assert_eq!(config.cleanup_interval, Duration::from_secs(1800));
        assert!(!config.warm_cache_on_start);
        assert_eq!(config.store_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: RevocationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.cleanup_interval, Duration::from_secs(3600));
    }
}
