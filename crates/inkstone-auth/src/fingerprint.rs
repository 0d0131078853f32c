//! Token fingerprinting.
//!
//! Raw session tokens are bearer secrets and must never be persisted or
//! logged. The revocation service therefore keys everything on a
//! *fingerprint*: the SHA-256 digest of the raw token, hex encoded. The
//! same token always yields the same fingerprint, different tokens yield
//! different fingerprints with overwhelming probability, and the digest
//! cannot be reversed to recover the token.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Length of a fingerprint in characters (hex-encoded SHA-256).
pub const FINGERPRINT_LEN: usize = 64;

/// One-way derived identifier for a session token.
///
/// Fingerprints are safe to persist, log, and index; the raw token never
/// leaves the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    /// Computes the fingerprint of a raw session token.
    #[must_use]
    pub fn compute(raw_token: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(raw_token.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Reconstructs a fingerprint from its hex representation, as read
    /// back from a durable store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the value is not a 64-character
    /// lowercase hex string.
    pub fn from_hex(value: impl Into<String>) -> AuthResult<Self> {
        let value = value.into();
        if value.len() != FINGERPRINT_LEN
            || !value.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
        {
            return Err(AuthError::invalid_token(format!(
                "not a {FINGERPRINT_LEN}-character hex fingerprint"
            )));
        }
        Ok(Self(value))
    }

    /// Returns the fingerprint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the fingerprint, returning the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TokenFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = TokenFingerprint::compute("session-token-value");
        let b = TokenFingerprint::compute("session-token-value");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_distinct_tokens() {
        let a = TokenFingerprint::compute("token-one");
        let b = TokenFingerprint::compute("token-two");
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = TokenFingerprint::compute("abc");
        assert_eq!(fp.as_str().len(), FINGERPRINT_LEN);
        assert!(fp.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
        // Known SHA-256 of "abc".
        assert_eq!(
            fp.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fingerprint_never_reveals_token() {
        let fp = TokenFingerprint::compute("super-secret-session-token");
        assert!(!fp.as_str().contains("secret"));
    }

    #[test]
    fn test_from_hex_round_trip() {
        let fp = TokenFingerprint::compute("abc");
        let restored = TokenFingerprint::from_hex(fp.as_str()).unwrap();
        assert_eq!(fp, restored);
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert!(TokenFingerprint::from_hex("deadbeef").is_err());
        assert!(TokenFingerprint::from_hex("zz".repeat(32)).is_err());
        let uppercase = "AB".repeat(32);
        assert!(TokenFingerprint::from_hex(uppercase).is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let fp = TokenFingerprint::compute("abc");
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, format!("\"{}\"", fp.as_str()));
        let back: TokenFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }
}
