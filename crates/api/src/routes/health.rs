//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use vible_core::HealthStatus;
use vible_core::wire::HealthResponse;

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Reports healthy whenever the server is running. Does not check the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        timestamp: Utc::now(),
    })
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the signature document cannot be read.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
