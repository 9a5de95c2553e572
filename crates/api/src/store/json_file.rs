use std::fs;
use std::path::{Path, PathBuf};

use vible_core::Signature;

use super::{BackendError, SignatureBackend};

/// Signatures stored as one pretty-printed JSON array in a file.
///
/// Writes go to a sibling temp file that is then renamed over the document,
/// so readers never observe a partially written array.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Open the document at `path`, creating it (and its parent directory)
    /// as an empty array if it does not exist.
    ///
    /// An existing document is left untouched, even if it is unreadable.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Io`] if the directory or file cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let backend = Self { path: path.into() };
        if !backend.path.exists() {
            backend.save(&[])?;
            tracing::info!(path = %backend.path.display(), "Created empty signature document");
        }
        Ok(backend)
    }

    /// Open an existing document without creating anything.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Io`] with [`std::io::ErrorKind::NotFound`] if
    /// there is no document at `path`.
    pub fn existing(path: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let backend = Self { path: path.into() };
        if !backend.path.is_file() {
            return Err(BackendError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no signature document at {}", backend.path.display()),
            )));
        }
        Ok(backend)
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SignatureBackend for JsonFileBackend {
    fn load(&self) -> Result<Vec<Signature>, BackendError> {
        let bytes = fs::read(&self.path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, signatures: &[Signature]) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let bytes = serde_json::to_vec_pretty(signatures)?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, bytes)?;
        fs::rename(tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vible_core::{FingerprintHasher, SignatureDraft};

    fn record(name: &str) -> Signature {
        Signature::new(
            SignatureDraft::new(name, "Hi").validate().unwrap(),
            FingerprintHasher::default().fingerprint(Some("10.0.0.1"), Some(name)),
            "test-agent",
            Utc::now(),
        )
    }

    #[test]
    fn test_open_creates_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("signatures.json");

        let backend = JsonFileBackend::open(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn test_open_keeps_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.json");
        fs::write(&path, "not json").unwrap();

        let backend = JsonFileBackend::open(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
        assert!(matches!(backend.load(), Err(BackendError::Json(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.json");
        let backend = JsonFileBackend::open(&path).unwrap();

        let records = vec![record("Ann"), record("Bob")];
        backend.save(&records).unwrap();

        let reopened = JsonFileBackend::open(&path).unwrap();
        assert_eq!(reopened.load().unwrap(), records);
        assert!(!backend.tmp_path().exists());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"hashedIP\""));
        assert!(raw.contains('\n'));
    }

    #[test]
    fn test_empty_file_reads_as_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.json");
        fs::write(&path, "  \n").unwrap();

        let backend = JsonFileBackend::open(&path).unwrap();
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.json");
        let backend = JsonFileBackend::open(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(matches!(backend.load(), Err(BackendError::Io(_))));
    }

    #[test]
    fn test_existing_does_not_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.json");

        match JsonFileBackend::existing(&path) {
            Err(BackendError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(!path.exists());

        JsonFileBackend::open(&path).unwrap();
        assert!(JsonFileBackend::existing(&path).is_ok());
    }
}
