//! Signature records, drafts, and validation.
//!
//! A signature is a short public commitment (`name` + `message`) left on the
//! site. Records are append-only: they are never edited or deleted, and only
//! the last [`DUPLICATE_WINDOW_HOURS`] participate in duplicate detection.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::types::{Email, SignatureId};

/// Maximum length of a signer's name, in characters.
pub const MAX_NAME_CHARS: usize = 100;
/// Maximum length of a signature message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;
/// Longest location kept; longer input is truncated.
pub const MAX_LOCATION_CHARS: usize = 100;
/// Default number of records returned by a recent listing.
pub const DEFAULT_RECENT_LIMIT: usize = 10;
/// Default rolling window for duplicate detection.
pub const DUPLICATE_WINDOW_HOURS: i64 = 24;

/// Errors produced when validating a [`SignatureDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureValidationError {
    /// Name or message is empty after trimming.
    #[error("Name and message are required")]
    MissingFields,
    /// Name exceeds [`MAX_NAME_CHARS`].
    #[error("Name must be at most {max} characters")]
    NameTooLong { max: usize },
    /// Message exceeds [`MAX_MESSAGE_CHARS`].
    #[error("Message must be at most {max} characters")]
    MessageTooLong { max: usize },
}

/// A signature as submitted by the form, before validation.
///
/// Missing JSON fields deserialize as empty so they fail validation rather
/// than JSON parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A draft that passed validation, with every field normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignature {
    pub name: String,
    pub message: String,
    pub location: Option<String>,
    pub email: Option<Email>,
}

impl SignatureDraft {
    /// Create a draft with just the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Validate and normalize the draft.
    ///
    /// Name and message are trimmed, then checked for presence and length.
    /// Optional fields never fail validation: an over-long location is
    /// truncated, and an email that does not parse is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureValidationError`] if name or message is missing or
    /// too long.
    pub fn validate(&self) -> Result<ValidSignature, SignatureValidationError> {
        let name = self.name.trim();
        let message = self.message.trim();

        if name.is_empty() || message.is_empty() {
            return Err(SignatureValidationError::MissingFields);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(SignatureValidationError::NameTooLong {
                max: MAX_NAME_CHARS,
            });
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(SignatureValidationError::MessageTooLong {
                max: MAX_MESSAGE_CHARS,
            });
        }

        let location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().take(MAX_LOCATION_CHARS).collect());
        let email = self.email.as_deref().and_then(|e| Email::parse(e).ok());

        Ok(ValidSignature {
            name: name.to_owned(),
            message: message.to_owned(),
            location,
            email,
        })
    }
}

/// A stored signature record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub id: SignatureId,
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(flatten)]
    pub fingerprint: Fingerprint,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
}

impl Signature {
    /// Build a new record from a validated draft.
    #[must_use]
    pub fn new(
        valid: ValidSignature,
        fingerprint: Fingerprint,
        user_agent: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SignatureId::generate(now),
            name: valid.name,
            message: valid.message,
            location: valid.location,
            email: valid.email,
            fingerprint,
            timestamp: now,
            user_agent: user_agent.into(),
        }
    }

    /// Whether this record was created less than `window` before `now`.
    #[must_use]
    pub fn is_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now.signed_duration_since(self.timestamp) < window
    }

    /// The externally visible subset of this record.
    #[must_use]
    pub fn to_public(&self) -> PublicSignature {
        PublicSignature {
            id: self.id.clone(),
            name: self.name.clone(),
            message: self.message.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// The public projection of a [`Signature`].
///
/// Excludes the fingerprint, user agent, and contact fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSignature {
    pub id: SignatureId,
    pub name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Find a record with the same fingerprint created within `window` of `now`.
#[must_use]
pub fn find_recent_duplicate<'a>(
    signatures: &'a [Signature],
    fingerprint: &Fingerprint,
    now: DateTime<Utc>,
    window: Duration,
) -> Option<&'a Signature> {
    signatures
        .iter()
        .find(|sig| &sig.fingerprint == fingerprint && sig.is_within(now, window))
}

/// The `limit` most recent records, newest first, as public projections.
///
/// Records with equal timestamps are ordered by position, later first.
#[must_use]
pub fn most_recent(signatures: &[Signature], limit: usize) -> Vec<PublicSignature> {
    let mut newest_first: Vec<&Signature> = signatures.iter().rev().collect();
    newest_first.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    newest_first
        .into_iter()
        .take(limit)
        .map(Signature::to_public)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fingerprint::FingerprintHasher;

    fn record(name: &str, fingerprint: Fingerprint, at: DateTime<Utc>) -> Signature {
        let valid = SignatureDraft::new(name, "Hi").validate().unwrap();
        Signature::new(valid, fingerprint, "test-agent", at)
    }

    fn fingerprint(ip: &str, session: &str) -> Fingerprint {
        FingerprintHasher::default().fingerprint(Some(ip), Some(session))
    }

    #[test]
    fn test_validate_trims_and_accepts() {
        let mut draft = SignatureDraft::new("  Ann ", " Hi\n");
        draft.location = Some("  Portland, OR ".into());
        draft.email = Some("ANN@example.com".into());

        let valid = draft.validate().unwrap();
        assert_eq!(valid.name, "Ann");
        assert_eq!(valid.message, "Hi");
        assert_eq!(valid.location.as_deref(), Some("Portland, OR"));
        assert_eq!(valid.email.unwrap().as_str(), "ann@example.com");
    }

    #[test]
    fn test_validate_missing_fields() {
        assert_eq!(
            SignatureDraft::new("", "Hi").validate(),
            Err(SignatureValidationError::MissingFields)
        );
        assert_eq!(
            SignatureDraft::new("Ann", "   ").validate(),
            Err(SignatureValidationError::MissingFields)
        );
    }

    #[test]
    fn test_validate_lengths() {
        let name_ok = "n".repeat(MAX_NAME_CHARS);
        let message_ok = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(SignatureDraft::new(&name_ok, &message_ok).validate().is_ok());

        assert!(matches!(
            SignatureDraft::new("n".repeat(MAX_NAME_CHARS + 1), "Hi").validate(),
            Err(SignatureValidationError::NameTooLong { .. })
        ));
        assert!(matches!(
            SignatureDraft::new("Ann", "m".repeat(MAX_MESSAGE_CHARS + 1)).validate(),
            Err(SignatureValidationError::MessageTooLong { .. })
        ));
    }

    #[test]
    fn test_validate_drops_bad_optional_fields() {
        let mut draft = SignatureDraft::new("Ann", "Hi");
        draft.location = Some("x".repeat(300));
        draft.email = Some("not-an-email".into());

        let valid = draft.validate().unwrap();
        assert_eq!(valid.location.unwrap().len(), MAX_LOCATION_CHARS);
        assert!(valid.email.is_none());
    }

    #[test]
    fn test_duplicate_window() {
        let now = Utc::now();
        let window = Duration::hours(DUPLICATE_WINDOW_HOURS);
        let fp = fingerprint("10.0.0.1", "session-a");
        let records = vec![
            record("old", fp.clone(), now - Duration::hours(25)),
            record("other", fingerprint("10.0.0.2", "session-a"), now),
        ];

        assert!(find_recent_duplicate(&records, &fp, now, window).is_none());

        let mut records = records;
        records.push(record("fresh", fp.clone(), now - Duration::hours(23)));
        let dup = find_recent_duplicate(&records, &fp, now, window).unwrap();
        assert_eq!(dup.name, "fresh");
    }

    #[test]
    fn test_same_ip_different_session_is_not_duplicate() {
        let now = Utc::now();
        let records = vec![record("a", fingerprint("10.0.0.1", "s1"), now)];
        let other = fingerprint("10.0.0.1", "s2");

        assert!(
            find_recent_duplicate(&records, &other, now, Duration::hours(24)).is_none()
        );
    }

    #[test]
    fn test_most_recent_orders_and_limits() {
        let base = Utc::now();
        let records: Vec<Signature> = (0..15)
            .map(|i| {
                // Interleave so insertion order differs from time order.
                let offset = if i % 2 == 0 { i } else { 30 - i };
                record(
                    &format!("n{i}"),
                    fingerprint("10.0.0.1", &format!("s{i}")),
                    base - Duration::minutes(offset),
                )
            })
            .collect();

        let recent = most_recent(&records, DEFAULT_RECENT_LIMIT);
        assert_eq!(recent.len(), DEFAULT_RECENT_LIMIT);
        assert!(
            recent
                .windows(2)
                .all(|pair| pair[0].timestamp > pair[1].timestamp)
        );
        assert_eq!(recent.first().unwrap().name, "n0");
    }

    #[test]
    fn test_public_projection_omits_private_fields() {
        let mut draft = SignatureDraft::new("Ann", "Hi");
        draft.email = Some("ann@example.com".into());
        let sig = Signature::new(
            draft.validate().unwrap(),
            fingerprint("10.0.0.1", "s"),
            "Mozilla/5.0",
            Utc::now(),
        );

        let json = serde_json::to_value(sig.to_public()).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        for private in ["hashedIP", "sessionId", "userAgent", "email"] {
            assert!(json.get(private).is_none(), "{private} leaked");
        }
    }

    #[test]
    fn test_stored_record_wire_format() {
        let sig = record("Ann", fingerprint("10.0.0.1", "s"), Utc::now());
        let json = serde_json::to_value(&sig).unwrap();

        assert!(json["hashedIP"].is_string());
        assert_eq!(json["sessionId"], "s");
        assert_eq!(json["userAgent"], "test-agent");
        assert!(json.get("location").is_none());

        let back: Signature = serde_json::from_value(json).unwrap();
        assert_eq!(back, sig);
    }
}
