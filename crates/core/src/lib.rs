//! The Vible Core - Shared types library.
//!
//! This crate provides the types and pure logic used across all Vible components:
//! - `api` - Signature collection HTTP service
//! - `client` - Browser-side cart, checkout, and signature form flows
//! - `cli` - Command-line tools for inspecting the signature store and catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async runtime. This keeps it lightweight and allows it to be
//! used on both sides of the wire.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`cart`] - Cart line items and the cart reducer
//! - [`catalog`] - The product catalog and its search/sort helpers
//! - [`quotes`] - Inspirational quotes with category and inspiration level
//! - [`signature`] - Signature records, drafts, and validation
//! - [`fingerprint`] - Pseudonymous client fingerprints for duplicate detection
//! - [`wire`] - Request and response bodies of the signature HTTP API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod fingerprint;
pub mod quotes;
pub mod signature;
pub mod types;
pub mod wire;

pub use cart::{Cart, CartItem, CartLineInput, CartSummary};
pub use fingerprint::{Fingerprint, FingerprintHasher};
pub use signature::{
    PublicSignature, Signature, SignatureDraft, SignatureValidationError, ValidSignature,
};
pub use types::*;
