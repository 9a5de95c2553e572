//! Shopping cart line items and the cart reducer.
//!
//! The cart is an ordered list of [`CartItem`]s. Every mutation preserves the
//! invariant that a line present in the cart has `quantity >= 1` and that no
//! two lines share an ID.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{LineItemId, Price};

/// Flat shipping fee in cents, charged whenever the subtotal is non-zero.
pub const SHIPPING_FEE_CENTS: i64 = 599;

/// One line in the cart: a product (and optional size) with a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: LineItemId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CartItem {
    /// Price of this line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Input for [`Cart::add_to_cart`].
///
/// `quantity` defaults to 1 when absent or zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineInput {
    pub id: LineItemId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub size: Option<String>,
}

impl CartLineInput {
    /// Build a single-unit cart line for a catalog product.
    #[must_use]
    pub fn from_product(product: &Product, size: Option<&str>) -> Self {
        let size = size
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        Self {
            id: LineItemId::for_product(&product.id, size.as_deref()),
            name: product.name.clone(),
            price: product.price,
            quantity: Some(1),
            size,
        }
    }

    /// Set the quantity to add.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    fn effective_quantity(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }
}

/// Derived cart totals, computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub item_count: u32,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

/// The cart reducer.
///
/// All operations are synchronous and infallible; each returns whether the
/// cart changed so observers can skip redundant notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line by ID.
    #[must_use]
    pub fn get(&self, id: &LineItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a line, merging with an existing line of the same ID.
    ///
    /// Merging increments the existing quantity by the incoming quantity
    /// (saturating); the existing line's name, price and size are kept.
    pub fn add_to_cart(&mut self, line: CartLineInput) -> bool {
        let quantity = line.effective_quantity();

        if let Some(existing) = self.items.iter_mut().find(|item| item.id == line.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return true;
        }

        self.items.push(CartItem {
            id: line.id,
            name: line.name,
            price: line.price,
            quantity,
            size: line.size,
        });
        true
    }

    /// Remove the line with the given ID. No-op if absent.
    pub fn remove_from_cart(&mut self, id: &LineItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Set a line's quantity; a quantity of zero or less removes the line.
    ///
    /// No-op if the ID is absent. Quantities above `u32::MAX` saturate.
    pub fn update_quantity(&mut self, id: &LineItemId, new_quantity: i64) -> bool {
        if new_quantity <= 0 {
            return self.remove_from_cart(id);
        }

        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Take `purchased` out of the cart.
    ///
    /// Each purchased line reduces the matching line by its quantity; lines
    /// that reach zero are removed. Anything added after `purchased` was
    /// taken stays.
    pub fn remove_purchased(&mut self, purchased: &[CartItem]) -> bool {
        let mut changed = false;
        for bought in purchased {
            if let Some(item) = self.items.iter_mut().find(|item| item.id == bought.id) {
                item.quantity = item.quantity.saturating_sub(bought.quantity);
                changed = true;
            }
        }
        self.items.retain(|item| item.quantity > 0);
        changed
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    /// Total number of units (sum of quantities).
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Flat shipping fee, applied only when the subtotal is positive.
    #[must_use]
    pub fn shipping(&self) -> Price {
        if self.subtotal().is_positive() {
            Price::from_cents(SHIPPING_FEE_CENTS)
        } else {
            Price::zero()
        }
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal() + self.shipping()
    }

    /// All derived totals at once.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let subtotal = self.subtotal();
        let shipping = self.shipping();
        CartSummary {
            item_count: self.total_items(),
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}
