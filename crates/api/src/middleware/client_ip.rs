//! Client IP resolution.
//!
//! Behind Cloudflare or Fly.io the socket peer is the proxy, so the real
//! client IP comes from a forwarding header. Those headers are trivially
//! spoofed when the server is reachable directly, so they are only read when
//! `VIBLE_TRUST_PROXY` is set. Otherwise the socket peer address is used.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{Extensions, HeaderMap, request::Parts};

use crate::state::AppState;

/// Forwarding headers, most trusted first.
const FORWARDED_HEADERS: &[&str] = &[
    // Cloudflare's real client IP
    "cf-connecting-ip",
    // First IP in the proxy chain
    "x-forwarded-for",
    "x-real-ip",
    // Fly.io
    "fly-client-ip",
];

/// Resolve the client IP for a request.
///
/// IPv4-mapped IPv6 addresses are reported as IPv4 so the same client hashes
/// the same way whichever stack it arrived on.
#[must_use]
pub fn resolve_client_ip(
    headers: &HeaderMap,
    extensions: &Extensions,
    trust_proxy: bool,
) -> Option<IpAddr> {
    let forwarded = trust_proxy.then(|| forwarded_ip(headers)).flatten();
    forwarded
        .or_else(|| {
            extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
        .map(|ip| ip.to_canonical())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    FORWARDED_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    })
}

/// Extractor for the resolved client IP (`None` when it cannot be determined).
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_client_ip(
            &parts.headers,
            &parts.extensions,
            state.config().trust_proxy,
        )))
    }
}
