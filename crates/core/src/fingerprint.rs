//! Pseudonymous client fingerprints for duplicate signature detection.
//!
//! A fingerprint pairs a salted hash of the client's IP address with the
//! client-supplied session token. The raw IP is never stored. This is a
//! best-effort pseudonymization, not a security control: anyone who knows the
//! salt can confirm a guessed IP.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Placeholder used when the IP or session token is unavailable.
pub const UNKNOWN: &str = "unknown";

/// Longest session token kept; longer values are truncated.
pub const MAX_SESSION_ID_CHARS: usize = 128;

/// Bytes of the SHA-256 digest kept in the hashed IP.
const HASH_BYTES: usize = 12;

/// The `(hashedIP, sessionId)` pair identifying a submitter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    #[serde(rename = "hashedIP")]
    pub hashed_ip: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Derives fingerprints with an optional deployment-wide salt.
#[derive(Clone, Default)]
pub struct FingerprintHasher {
    salt: Vec<u8>,
}

impl std::fmt::Debug for FingerprintHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintHasher")
            .field("salt", &if self.salt.is_empty() { "[NONE]" } else { "[REDACTED]" })
            .finish()
    }
}

impl FingerprintHasher {
    /// Create a hasher. An empty salt behaves the same as no salt.
    #[must_use]
    pub fn new(salt: Option<&str>) -> Self {
        Self {
            salt: salt.map(|s| s.as_bytes().to_vec()).unwrap_or_default(),
        }
    }

    /// Hash a client IP address into a stable, URL-safe token.
    #[must_use]
    pub fn hash_ip(&self, ip: &str) -> String {
        let mut hasher = Sha256::new();
        if !self.salt.is_empty() {
            hasher.update(&self.salt);
            hasher.update([0u8]);
        }
        hasher.update(ip.as_bytes());

        let digest: Vec<u8> = hasher.finalize().into_iter().take(HASH_BYTES).collect();
        URL_SAFE_NO_PAD.encode(digest)
    }

    /// Build the fingerprint for a client IP and optional session header.
    #[must_use]
    pub fn fingerprint(&self, ip: Option<&str>, session_id: Option<&str>) -> Fingerprint {
        Fingerprint {
            hashed_ip: self.hash_ip(ip.unwrap_or(UNKNOWN)),
            session_id: normalize_session_id(session_id),
        }
    }
}

/// Trim and bound a client-supplied session token, defaulting to `"unknown"`.
#[must_use]
pub fn normalize_session_id(session_id: Option<&str>) -> String {
    match session_id.map(str::trim) {
        Some(id) if !id.is_empty() => id.chars().take(MAX_SESSION_ID_CHARS).collect(),
        _ => UNKNOWN.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_hides_ip() {
        let hasher = FingerprintHasher::new(None);
        let a = hasher.hash_ip("203.0.113.7");
        let b = hasher.hash_ip("203.0.113.7");

        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert_ne!(a, hasher.hash_ip("203.0.113.8"));
    }

    #[test]
    fn test_salt_changes_hash() {
        let plain = FingerprintHasher::new(None).hash_ip("198.51.100.1");
        let salted = FingerprintHasher::new(Some("k9$Qw!r7")).hash_ip("198.51.100.1");
        let empty = FingerprintHasher::new(Some("")).hash_ip("198.51.100.1");

        assert_ne!(plain, salted);
        assert_eq!(plain, empty);
    }

    #[test]
    fn test_fingerprint_defaults() {
        let hasher = FingerprintHasher::default();
        let fp = hasher.fingerprint(None, Some("   "));

        assert_eq!(fp.session_id, UNKNOWN);
        assert_eq!(fp.hashed_ip, hasher.hash_ip(UNKNOWN));
    }

    #[test]
    fn test_session_id_is_bounded() {
        let long = "s".repeat(500);
        assert_eq!(
            normalize_session_id(Some(&long)).len(),
            MAX_SESSION_ID_CHARS
        );
        assert_eq!(normalize_session_id(Some(" abc ")), "abc");
    }

    #[test]
    fn test_debug_redacts_salt() {
        let hasher = FingerprintHasher::new(Some("very-private-salt"));
        let debug = format!("{hasher:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("very-private-salt"));
    }

    #[test]
    fn test_wire_field_names() {
        let fp = Fingerprint {
            hashed_ip: "abc".into(),
            session_id: "s-1".into(),
        };
        let json = serde_json::to_value(&fp).unwrap();
        assert_eq!(json["hashedIP"], "abc");
        assert_eq!(json["sessionId"], "s-1");
    }
}
