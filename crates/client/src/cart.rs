//! Observable cart store.

use std::sync::Arc;

use tokio::sync::watch;
use vible_core::{Cart, CartItem, CartLineInput, CartSummary, LineItemId};

/// The cart, owned by the application and observed by views.
///
/// Clones share the same cart. Mutations that change nothing do not wake
/// subscribers.
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Arc<watch::Sender<Cart>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create a store holding an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cart(Cart::new())
    }

    /// Create a store holding `cart`.
    #[must_use]
    pub fn with_cart(cart: Cart) -> Self {
        Self {
            cart: Arc::new(watch::Sender::new(cart)),
        }
    }

    /// Watch the cart. The receiver sees the current cart immediately.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart.subscribe()
    }

    /// A copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.cart.borrow().clone()
    }

    /// Current totals.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.cart.borrow().summary()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.cart.borrow().total_items()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.borrow().is_empty()
    }

    /// Add a line, merging with an existing line of the same ID.
    pub fn add_to_cart(&self, line: CartLineInput) {
        self.cart.send_if_modified(|cart| cart.add_to_cart(line));
    }

    /// Remove a line. No-op if absent.
    pub fn remove_from_cart(&self, id: &LineItemId) {
        self.cart.send_if_modified(|cart| cart.remove_from_cart(id));
    }

    /// Set a line's quantity; zero or less removes it.
    pub fn update_quantity(&self, id: &LineItemId, quantity: i64) {
        self.cart
            .send_if_modified(|cart| cart.update_quantity(id, quantity));
    }

    /// Take purchased lines out of the cart, keeping anything added since.
    pub fn remove_purchased(&self, purchased: &[CartItem]) {
        self.cart
            .send_if_modified(|cart| cart.remove_purchased(purchased));
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        self.cart.send_if_modified(Cart::clear_cart);
    }
}
