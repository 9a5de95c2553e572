//! The signature store.
//!
//! [`SignatureStore`] owns the read-modify-write cycle over a
//! [`SignatureBackend`]. Every submit runs as one task on Tokio's blocking
//! pool that holds the write lock from load to save, so concurrent
//! submissions are serialized and duplicate detection sees every record
//! written before it. Dropping the caller's future does not end the task
//! early; the lock is released only once the save has finished.

mod json_file;
mod memory;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{Span, instrument};
use vible_core::fingerprint::UNKNOWN;
use vible_core::signature::{self, DUPLICATE_WINDOW_HOURS};
use vible_core::{
    FingerprintHasher, PublicSignature, Signature, SignatureDraft, SignatureValidationError,
};

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("signature store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("signature store serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("signature store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors from [`SignatureStore::submit`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] SignatureValidationError),
    #[error("duplicate signature detected")]
    DuplicateSubmission,
    #[error(transparent)]
    Persistence(#[from] BackendError),
}

/// Where signature records live.
///
/// Implementations load and save the whole collection at once. They need no
/// locking of their own beyond what keeps a single call consistent; the
/// store serializes writers.
pub trait SignatureBackend: Send + Sync + 'static {
    /// Read every stored record, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the records cannot be read or parsed.
    fn load(&self) -> Result<Vec<Signature>, BackendError>;

    /// Replace the stored collection.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the records cannot be written.
    fn save(&self, signatures: &[Signature]) -> Result<(), BackendError>;
}

/// A signature submission along with the request metadata it came with.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub draft: SignatureDraft,
    /// Client IP as resolved by the server.
    pub client_ip: Option<String>,
    /// `x-session-id` header.
    pub session_id: Option<String>,
    /// `user-agent` header.
    pub user_agent: Option<String>,
}

/// Result of an accepted submission.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub signature: PublicSignature,
    /// Total number of records after the insert.
    pub total: usize,
}

/// Shared handle to the signature store. Cheap to clone.
#[derive(Clone)]
pub struct SignatureStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: Arc<dyn SignatureBackend>,
    hasher: FingerprintHasher,
    window: Duration,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for SignatureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureStore")
            .field("hasher", &self.inner.hasher)
            .field("window", &self.inner.window)
            .finish_non_exhaustive()
    }
}

impl SignatureStore {
    /// Create a store over `backend`.
    #[must_use]
    pub fn new(
        backend: impl SignatureBackend,
        hasher: FingerprintHasher,
        window: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                backend: Arc::new(backend),
                hasher,
                window,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// An unsalted in-memory store with the default duplicate window.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            MemoryBackend::new(),
            FingerprintHasher::default(),
            Duration::hours(DUPLICATE_WINDOW_HOURS),
        )
    }

    /// Number of stored signatures.
    ///
    /// A backend failure is logged and reported as zero.
    #[instrument(skip(self))]
    pub async fn count(&self) -> usize {
        match self.load().await {
            Ok(signatures) => signatures.len(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read signatures for count");
                0
            }
        }
    }

    /// The `limit` most recent signatures, newest first.
    ///
    /// A backend failure is logged and reported as an empty list.
    #[instrument(skip(self))]
    pub async fn list_recent(&self, limit: usize) -> Vec<PublicSignature> {
        match self.load().await {
            Ok(signatures) => signature::most_recent(&signatures, limit),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read signatures for recent list");
                Vec::new()
            }
        }
    }

    /// Check that the backend can be read.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`BackendError`].
    pub async fn check(&self) -> Result<(), BackendError> {
        self.load().await.map(|_| ())
    }

    /// Validate, de-duplicate, and append a signature.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the draft is invalid (nothing is read)
    /// - [`StoreError::DuplicateSubmission`] if the same fingerprint signed
    ///   within the window
    /// - [`StoreError::Persistence`] if the records cannot be read or written
    #[instrument(skip_all)]
    pub async fn submit(&self, submission: Submission) -> Result<SubmitReceipt, StoreError> {
        let valid = submission.draft.validate()?;
        let fingerprint = self.inner.hasher.fingerprint(
            submission.client_ip.as_deref(),
            submission.session_id.as_deref(),
        );

        let inner = Arc::clone(&self.inner);
        let span = Span::current();
        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let _guard = inner.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

            let mut signatures = inner.backend.load()?;
            let now = Utc::now();
            if signature::find_recent_duplicate(&signatures, &fingerprint, now, inner.window)
                .is_some()
            {
                tracing::info!(session_id = %fingerprint.session_id, "Duplicate signature rejected");
                return Err(StoreError::DuplicateSubmission);
            }

            let user_agent = submission.user_agent.unwrap_or_else(|| UNKNOWN.to_owned());
            let record = Signature::new(valid, fingerprint, user_agent, now);
            let public = record.to_public();
            signatures.push(record);
            let total = signatures.len();

            inner.backend.save(&signatures)?;
            tracing::info!(signature_id = %public.id, total, "Signature added");

            Ok(SubmitReceipt {
                signature: public,
                total,
            })
        })
        .await
        .map_err(BackendError::from)?
    }

    async fn load(&self) -> Result<Vec<Signature>, BackendError> {
        let backend = Arc::clone(&self.inner.backend);
        tokio::task::spawn_blocking(move || backend.load()).await?
    }
}
