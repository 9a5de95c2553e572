//! The Vible client flows.
//!
//! UI-independent state machines for the browser side of the site:
//!
//! - [`cart`] - Observable cart store
//! - [`checkout`] - Simulated checkout with a pluggable payment processor
//! - [`api`] - HTTP client for the signature API
//! - [`submission`] - Signature form state machine
//!
//! Views subscribe to `tokio::sync::watch` channels rather than reading
//! ambient globals, so every flow can be driven directly from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod submission;

pub use api::{ClientError, SignatureApi, SignatureClient};
pub use cart::CartStore;
pub use checkout::{
    CheckoutError, CheckoutFlow, CheckoutReceipt, PaymentConfirmation, PaymentError,
    PaymentProcessor, SimulatedPayment,
};
pub use submission::{DisplayData, FailureReason, SubmissionFlow, SubmissionState, SubmitError};
