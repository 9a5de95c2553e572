//! Simulated checkout.
//!
//! Checkout waits a fixed delay, charges the cart through a
//! [`PaymentProcessor`], then removes the charged lines from the cart. The status channel reads
//! `Processing` for the whole attempt and always returns to `Idle`, whether
//! the attempt succeeds, fails, or is cancelled.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use uuid::Uuid;
use vible_core::{CartItem, CartSummary, CheckoutStatus, Price};

use crate::cart::CartStore;

/// Delay before the simulated payment is attempted.
pub const DEFAULT_CHECKOUT_DELAY: Duration = Duration::from_secs(2);

/// Errors returned by a payment processor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("payment processor unavailable: {0}")]
    Unavailable(String),
}

/// Errors from a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("a checkout is already in progress")]
    AlreadyProcessing,

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Proof that a payment went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub reference: String,
    pub amount: Price,
}

/// Charges a cart.
pub trait PaymentProcessor: Send + Sync {
    /// Charge `summary.total`.
    fn process(
        &self,
        summary: &CartSummary,
    ) -> impl Future<Output = Result<PaymentConfirmation, PaymentError>> + Send;
}

/// Accepts every payment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedPayment;

impl PaymentProcessor for SimulatedPayment {
    async fn process(&self, summary: &CartSummary) -> Result<PaymentConfirmation, PaymentError> {
        Ok(PaymentConfirmation {
            reference: format!("sim_{}", Uuid::new_v4().simple()),
            amount: summary.total,
        })
    }
}

/// What was bought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub confirmation: PaymentConfirmation,
    pub summary: CartSummary,
    pub items: Vec<CartItem>,
}

/// Drives checkout for a cart.
#[derive(Debug)]
pub struct CheckoutFlow<P = SimulatedPayment> {
    processor: P,
    delay: Duration,
    status: watch::Sender<CheckoutStatus>,
}

impl Default for CheckoutFlow<SimulatedPayment> {
    fn default() -> Self {
        Self::new(SimulatedPayment)
    }
}

impl<P: PaymentProcessor> CheckoutFlow<P> {
    #[must_use]
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            delay: DEFAULT_CHECKOUT_DELAY,
            status: watch::Sender::new(CheckoutStatus::Idle),
        }
    }

    /// Override the processing delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn status(&self) -> CheckoutStatus {
        *self.status.borrow()
    }

    /// Watch the checkout status.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CheckoutStatus> {
        self.status.subscribe()
    }

    /// Check out `cart`.
    ///
    /// The cart is charged as it stands once the delay has elapsed. The
    /// charged lines are removed only after the payment is confirmed; lines
    /// added while the payment is in flight stay in the cart. A failed
    /// payment leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if there is nothing to buy,
    /// [`CheckoutError::AlreadyProcessing`] if another checkout is in flight,
    /// or the processor's error if payment fails.
    pub async fn checkout(&self, cart: &CartStore) -> Result<CheckoutReceipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let claimed = self.status.send_if_modified(|status| {
            if status.is_processing() {
                false
            } else {
                *status = CheckoutStatus::Processing;
                true
            }
        });
        if !claimed {
            return Err(CheckoutError::AlreadyProcessing);
        }
        let _idle = IdleOnDrop(&self.status);

        tokio::time::sleep(self.delay).await;

        let snapshot = cart.snapshot();
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let summary = snapshot.summary();

        let confirmation = match self.processor.process(&summary).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                tracing::warn!(error = %e, total = %summary.total, "Checkout payment failed");
                return Err(e.into());
            }
        };

        cart.remove_purchased(snapshot.items());
        tracing::info!(
            reference = %confirmation.reference,
            items = summary.item_count,
            total = %summary.total,
            "Checkout complete"
        );

        Ok(CheckoutReceipt {
            confirmation,
            summary,
            items: snapshot.items().to_vec(),
        })
    }
}

/// Resets the status to `Idle` when the checkout attempt ends.
struct IdleOnDrop<'a>(&'a watch::Sender<CheckoutStatus>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(CheckoutStatus::Idle);
    }
}
