//! Command implementations.

pub mod catalog;
pub mod quotes;
pub mod signatures;

use vible_api::store::BackendError;

/// Errors from CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] BackendError),
}
