//! Application state shared across handlers.

use std::sync::Arc;

use vible_core::FingerprintHasher;

use crate::config::ApiConfig;
use crate::store::{BackendError, JsonFileBackend, SignatureStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the signature store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    store: SignatureStore,
}

impl AppState {
    /// Create application state around an existing store.
    #[must_use]
    pub fn new(config: ApiConfig, store: SignatureStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Open the JSON signature document named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or document cannot be created.
    pub fn from_config(config: ApiConfig) -> Result<Self, BackendError> {
        let backend = JsonFileBackend::open(config.signatures_path())?;
        let store = SignatureStore::new(
            backend,
            FingerprintHasher::new(config.salt()),
            config.duplicate_window(),
        );
        Ok(Self::new(config, store))
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the signature store.
    #[must_use]
    pub fn store(&self) -> &SignatureStore {
        &self.inner.store
    }
}
