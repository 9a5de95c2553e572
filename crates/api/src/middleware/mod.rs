//! HTTP middleware stack for the signature API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added by the binary)
//! 2. CORS
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//! 5. Security headers (CSP, frame, referrer, etc.)
//! 6. Panic catcher (JSON 500 response)
//!
//! Rate limiting (governor) wraps `POST /signatures` only.

pub mod client_ip;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use client_ip::{ClientIp, resolve_client_ip};
pub use rate_limit::{RateLimiterLayer, signature_rate_limiter};
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
