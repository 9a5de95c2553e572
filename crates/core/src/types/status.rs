//! Status enums shared by the client flows and the API.

use serde::{Deserialize, Serialize};

/// Checkout progress for a cart.
///
/// Checkout is simulated: `Processing` lasts a fixed delay, after which the
/// cart is cleared and the status returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    #[default]
    Idle,
    Processing,
}

impl CheckoutStatus {
    /// Whether a checkout is currently in flight.
    #[must_use]
    pub const fn is_processing(self) -> bool {
        matches!(self, Self::Processing)
    }
}

/// Where the signature count and recent list on display came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySource {
    /// Nothing has been loaded yet.
    #[default]
    Unloaded,
    /// Fetched from the signature API.
    Live,
    /// The API was unreachable; fixed sample data is shown instead.
    Placeholder,
}

/// Overall service health reported by `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
}
