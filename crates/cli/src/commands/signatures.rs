//! Signature document commands.
//!
//! These read and write `signatures.json` directly, the same file the API
//! serves. Run them while the API is stopped if you intend to write.

use std::path::{Path, PathBuf};

use vible_api::config::SIGNATURES_FILE;
use vible_api::store::{BackendError, JsonFileBackend, SignatureBackend};
use vible_core::PublicSignature;
use vible_core::signature;

fn document_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SIGNATURES_FILE)
}

/// Create an empty document unless one exists.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
pub fn init(data_dir: &Path) -> Result<PathBuf, BackendError> {
    let backend = JsonFileBackend::open(document_path(data_dir))?;
    tracing::info!(path = %backend.path().display(), "Signature document initialized");
    Ok(backend.path().to_path_buf())
}

/// Number of stored signatures.
///
/// # Errors
///
/// Returns an error if the document is missing or unreadable.
pub fn count(data_dir: &Path) -> Result<usize, BackendError> {
    let backend = JsonFileBackend::existing(document_path(data_dir))?;
    Ok(backend.load()?.len())
}

/// The `limit` newest signatures.
///
/// # Errors
///
/// Returns an error if the document is missing or unreadable.
pub fn recent(data_dir: &Path, limit: usize) -> Result<Vec<PublicSignature>, BackendError> {
    let backend = JsonFileBackend::existing(document_path(data_dir))?;
    Ok(signature::most_recent(&backend.load()?, limit))
}

/// One line per signature: `<timestamp>  <name>: <message>`.
#[must_use]
pub fn format_line(signature: &PublicSignature) -> String {
    format!(
        "{}  {}: {}",
        signature.timestamp.format("%Y-%m-%d %H:%M"),
        signature.name,
        signature.message
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use vible_core::{FingerprintHasher, Signature, SignatureDraft};

    use super::*;

    #[test]
    fn test_count_requires_document() {
        let dir = tempfile::tempdir().unwrap();
        assert!(count(dir.path()).is_err());

        let path = init(dir.path()).unwrap();
        assert!(path.ends_with(SIGNATURES_FILE));
        assert_eq!(count(dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_recent_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::open(document_path(dir.path())).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let records: Vec<Signature> = ["Ann", "Bob", "Cy"]
            .iter()
            .zip(0..)
            .map(|(name, i)| {
                Signature::new(
                    SignatureDraft::new(*name, "Hi").validate().unwrap(),
                    FingerprintHasher::default().fingerprint(Some("10.0.0.1"), Some(*name)),
                    "cli-test",
                    start + Duration::minutes(i),
                )
            })
            .collect();
        backend.save(&records).unwrap();

        let latest = recent(dir.path(), 2).unwrap();
        let names: Vec<&str> = latest.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Cy", "Bob"]);
        assert_eq!(format_line(&latest[0]), "2025-01-01 12:02  Cy: Hi");
    }
}
