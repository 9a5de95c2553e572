//! HTTP route handlers for the signature API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store readable)
//!
//! # Signatures
//! GET  /signatures             - Count and recent list
//! POST /signatures             - Submit a signature (rate limited)
//! GET  /signatures/count       - Total count
//! GET  /signatures/recent      - Most recent signatures (?limit=N)
//! ```
//!
//! Unmatched routes and unsupported methods return
//! `404 {"error": "Not found"}`, and handler panics
//! return `500 {"error": "Something went wrong!"}`.

pub mod health;
pub mod signatures;

use std::any::Any;

use axum::{
    Json, Router,
    http::{HeaderName, HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;
use vible_core::wire::{ErrorResponse, SESSION_ID_HEADER};

use crate::error::AppError;
use crate::middleware::request_id::REQUEST_ID_HEADER;
use crate::middleware::{RateLimiterLayer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the health routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/ready", get(health::readiness))
}

/// Create the signature routes router.
///
/// `submit_limiter` wraps `POST /signatures` only.
pub fn signature_routes(submit_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    let submit = post(signatures::submit);
    let submit = match submit_limiter {
        Some(limiter) => submit.layer(limiter),
        None => submit,
    };

    Router::new()
        .route("/", get(signatures::overview).merge(submit))
        .route("/count", get(signatures::count))
        .route("/recent", get(signatures::recent))
}

/// Create all routes for the API.
pub fn routes(submit_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/signatures", signature_routes(submit_limiter))
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
}

/// Build the full application: routes, state, and the middleware stack.
///
/// Sentry layers are left to the binary.
pub fn app(state: AppState, submit_limiter: Option<RateLimiterLayer>) -> Router {
    let cors = cors_layer(&state.config().cors_origins);

    routes(submit_limiter)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
}

/// CORS policy: any origin unless an allow-list is configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(SESSION_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

/// JSON 404 for unmatched routes.
async fn not_found() -> AppError {
    AppError::NotFound
}

/// JSON 500 for handler panics.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Something went wrong!")),
    )
        .into_response()
}
