//! Integration tests for The Vible.
//!
//! Each test starts the real API router on an ephemeral local port, backed
//! by a JSON document in a temporary directory, and talks to it over HTTP
//! with `vible-client` or plain `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vible-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `signatures` - HTTP contract of the signature API
//! - `concurrency` - Parallel submissions and persistence across restarts
//! - `client_flows` - `SubmissionFlow` against a live server

use std::net::SocketAddr;
use std::path::Path;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use vible_api::middleware::{RateLimiterLayer, signature_rate_limiter};
use vible_api::{ApiConfig, AppState};
use vible_client::SignatureClient;

/// A running API server.
///
/// The server task is aborted when this is dropped.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve the signature document in `data_dir`, without rate limiting.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn(data_dir: &Path) -> Self {
        Self::spawn_with(data_dir, None).await
    }

    /// Serve with the production submit rate limiter in place.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn_rate_limited(data_dir: &Path) -> Self {
        Self::spawn_with(data_dir, Some(signature_rate_limiter(false))).await
    }

    async fn spawn_with(data_dir: &Path, limiter: Option<RateLimiterLayer>) -> Self {
        let data_dir = data_dir.to_string_lossy().into_owned();
        let config = ApiConfig::from_lookup(|key| match key {
            "VIBLE_DATA_DIR" => Some(data_dir.clone()),
            _ => None,
        })
        .expect("test configuration is valid");

        let state = AppState::from_config(config).expect("signature document opens");
        let app = vible_api::app(state, limiter);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener has an address");

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("server runs");
        });

        Self { addr, handle }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    /// A client with a fresh session ID.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> SignatureClient {
        SignatureClient::new(&self.base_url()).expect("client builds")
    }

    /// Stop the server and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.handle.abort();
        let _ = (&mut self.handle).await;
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
