//! The Vible signature API library.
//!
//! This crate provides the signature collection service as a library,
//! allowing it to be tested and embedded. The `vible-api` binary wraps
//! [`app`] with Sentry, rate limiting, and a TCP listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

pub use config::ApiConfig;
pub use routes::app;
pub use state::AppState;
