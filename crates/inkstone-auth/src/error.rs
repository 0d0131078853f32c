//! Error types for the session revocation service.

/// Errors that can occur during revocation operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The durable store failed (I/O or constraint error).
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// A store operation exceeded the configured time bound.
    ///
    /// Treated as a storage failure by callers: a timed-out revoke is
    /// never a silent success.
    #[error("Store operation timed out: {operation}")]
    Timeout {
        /// The store operation that timed out.
        operation: &'static str,
    },

    /// The raw session token is malformed (e.g. empty).
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The revocation configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Timeout` error for the named store operation.
    #[must_use]
    pub fn timeout(operation: &'static str) -> Self {
        Self::Timeout { operation }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this error originated in the durable store
    /// (including timed-out store calls).
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Timeout { .. })
    }

    /// Returns `true` if this error was caused by bad caller input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidToken { .. })
    }
}

/// Type alias for revocation operation results.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::storage("connection refused");
        assert_eq!(err.to_string(), "Storage error: connection refused");

        let err = AuthError::timeout("insert_if_absent");
        assert_eq!(
            err.to_string(),
            "Store operation timed out: insert_if_absent"
        );

        let err = AuthError::invalid_token("empty session token");
        assert_eq!(err.to_string(), "Invalid token: empty session token");
    }

    #[test]
    fn test_error_predicates() {
        assert!(AuthError::storage("down").is_storage_error());
        assert!(AuthError::timeout("find_live").is_storage_error());
        assert!(!AuthError::storage("down").is_client_error());

        let err = AuthError::invalid_token("empty");
        assert!(err.is_client_error());
        assert!(!err.is_storage_error());

        let err = AuthError::configuration("zero interval");
        assert!(!err.is_client_error());
        assert!(!err.is_storage_error());
    }
}
