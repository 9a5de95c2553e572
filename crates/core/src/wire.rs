//! Request and response bodies of the signature HTTP API.
//!
//! Shared by the server and the client so both sides agree on field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::signature::PublicSignature;
use crate::types::HealthStatus;

/// Header carrying the client's per-session correlation token.
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Message returned with every accepted signature.
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Signature added successfully";

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

/// `GET /signatures/count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

/// `GET /signatures`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub total: usize,
    pub recent: Vec<PublicSignature>,
}

/// `POST /signatures` (201)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub total_signatures: usize,
}

impl SubmitResponse {
    #[must_use]
    pub fn accepted(total_signatures: usize) -> Self {
        Self {
            success: true,
            message: SUBMIT_SUCCESS_MESSAGE.to_string(),
            total_signatures,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_response_field_names() {
        let json = serde_json::to_value(SubmitResponse::accepted(3)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "message": "Signature added successfully",
                "totalSignatures": 3
            })
        );
    }
}
