use std::sync::{Arc, Mutex, PoisonError};

use vible_core::Signature;

use super::{BackendError, SignatureBackend};

/// Signatures held in process memory.
///
/// Clones share the same records. Used for tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: Arc<Mutex<Vec<Signature>>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing records.
    #[must_use]
    pub fn with_signatures(signatures: Vec<Signature>) -> Self {
        Self {
            records: Arc::new(Mutex::new(signatures)),
        }
    }
}

impl SignatureBackend for MemoryBackend {
    fn load(&self) -> Result<Vec<Signature>, BackendError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.clone())
    }

    fn save(&self, signatures: &[Signature]) -> Result<(), BackendError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        *records = signatures.to_vec();
        Ok(())
    }
}
