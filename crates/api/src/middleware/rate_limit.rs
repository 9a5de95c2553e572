//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Signature submissions are limited per client IP, resolved the same way as
//! for fingerprinting (see [`resolve_client_ip`]).

use std::net::IpAddr;
use std::sync::Arc;

use axum::Json;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};
use vible_core::wire::ErrorResponse;

use super::client_ip::resolve_client_ip;

/// Key extractor keyed on the resolved client IP.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    trust_proxy: bool,
}

impl ClientIpKeyExtractor {
    #[must_use]
    pub const fn new(trust_proxy: bool) -> Self {
        Self { trust_proxy }
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        resolve_client_ip(req.headers(), req.extensions(), self.trust_proxy)
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create the rate limiter for signature submissions: ~10 per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(6)` and `burst_size(5)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn signature_rate_limiter(trust_proxy: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trust_proxy))
        .per_second(6) // Replenish 1 token every 6 seconds (~10/minute)
        .burst_size(5) // Allow burst of 5 requests
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config)).error_handler(rate_limit_response)
}

/// `{error}` JSON in place of `tower_governor`'s plain-text rejections.
///
/// The `retry-after` and `x-ratelimit-*` headers are kept.
fn rate_limit_response(error: GovernorError) -> Response {
    let message = match &error {
        GovernorError::TooManyRequests { wait_time, .. } => {
            format!("Too many requests, please try again in {wait_time}s")
        }
        GovernorError::UnableToExtractKey | GovernorError::Other { .. } => {
            tracing::warn!(error = %error, "Rate limiter rejected request");
            "Something went wrong!".to_string()
        }
    };

    let (parts, _) = error.into_response().into_parts();
    let mut response = (parts.status, Json(ErrorResponse::new(message))).into_response();
    response.headers_mut().extend(parts.headers);
    response
}
