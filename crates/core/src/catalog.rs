//! The Vible product catalog.
//!
//! The catalog is small and fixed, so it is compiled in rather than fetched.
//! Store pages browse it with [`search`] and add products to the cart via
//! [`CartLineInput::from_product`](crate::CartLineInput::from_product).

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    pub sizes: Vec<String>,
    pub in_stock: bool,
    pub featured: bool,
}

impl Product {
    /// Whether the product comes in sizes.
    #[must_use]
    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }

    fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Product listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Name,
    PriceLow,
    PriceHigh,
}

/// Error parsing a [`SortOrder`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order '{0}' (expected name, price-low or price-high)")]
pub struct UnknownSortOrder(String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            other => Err(UnknownSortOrder(other.to_owned())),
        }
    }
}

/// Category filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    description: &str,
    cents: i64,
    image: &str,
    category: &str,
    sizes: &[&str],
    featured: bool,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Price::from_cents(cents),
        image: format!("/images/{image}.jpg"),
        category: category.to_owned(),
        sizes: sizes.iter().map(|s| (*s).to_owned()).collect(),
        in_stock: true,
        featured,
    }
}

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        product(
            "product-1",
            "Vibe T-Shirt",
            "Spread love and goodwill with this comfortable, high-quality cotton tee featuring The Vible logo",
            2999,
            "vibe-tshirt",
            "clothing",
            &["S", "M", "L", "XL"],
            true,
        ),
        product(
            "product-2",
            "Cloudy Sky Hoodie",
            "Embrace the calming energy with this soft, cozy hoodie in our signature cloudy blue sky color",
            4999,
            "cloudy-sky-hoodie",
            "clothing",
            &["S", "M", "L", "XL", "XXL"],
            true,
        ),
        product(
            "product-3",
            "Vibe Sticker Pack",
            "Decorate your world with love and goodwill. Set of 5 high-quality vinyl stickers",
            999,
            "vibe-stickers",
            "accessories",
            &[],
            false,
        ),
        product(
            "product-4",
            "Mindfulness Journal",
            "A beautiful journal to document your journey toward love and goodwill. 120 pages with guided prompts",
            1999,
            "mindfulness-journal",
            "books",
            &[],
            false,
        ),
        product(
            "product-5",
            "Vibe Water Bottle",
            "Stay hydrated while spreading positive energy. 32oz stainless steel bottle with The Vible design",
            2499,
            "vibe-water-bottle",
            "accessories",
            &[],
            false,
        ),
        product(
            "product-6",
            "Love & Goodwill Poster",
            "Beautiful wall art featuring our core message. 18x24 inch high-quality print",
            1499,
            "love-goodwill-poster",
            "home",
            &[],
            false,
        ),
    ]
});

static CATEGORIES: LazyLock<Vec<Category>> = LazyLock::new(|| {
    [
        ("clothing", "Clothing", "Wear your vibe with pride"),
        ("accessories", "Accessories", "Everyday items with positive energy"),
        ("books", "Books & Journals", "Tools for your spiritual journey"),
        ("home", "Home & Decor", "Bring the vibe into your space"),
    ]
    .into_iter()
    .map(|(id, name, description)| Category {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
    })
    .collect()
});

/// Every product, in catalog order.
#[must_use]
pub fn products() -> &'static [Product] {
    &PRODUCTS
}

/// Every category.
#[must_use]
pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

/// Look up a product by ID.
#[must_use]
pub fn product_by_id(id: &ProductId) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| &p.id == id)
}

/// Products flagged as featured.
pub fn featured_products() -> impl Iterator<Item = &'static Product> {
    PRODUCTS.iter().filter(|p| p.featured)
}

/// Products in a category; `None` returns the whole catalog.
pub fn products_by_category(category: Option<&str>) -> impl Iterator<Item = &'static Product> {
    PRODUCTS
        .iter()
        .filter(move |p| category.is_none_or(|c| p.category == c))
}

/// Filter and sort the catalog the way the store page does.
///
/// `query` matches name or description case-insensitively (empty matches
/// everything); `category` of `"all"` (or `None`) disables the filter.
/// Name ordering is case-insensitive; ties keep catalog order.
#[must_use]
pub fn search(query: &str, category: Option<&str>, sort: SortOrder) -> Vec<&'static Product> {
    let needle = query.trim().to_lowercase();
    let category = category.filter(|c| *c != ALL_CATEGORIES);

    let mut found: Vec<&'static Product> = products_by_category(category)
        .filter(|p| needle.is_empty() || p.matches_query(&needle))
        .collect();

    found.sort_by(|a, b| compare(a, b, sort));
    found
}

fn compare(a: &Product, b: &Product, sort: SortOrder) -> Ordering {
    match sort {
        SortOrder::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortOrder::PriceLow => a.price.amount.cmp(&b.price.amount),
        SortOrder::PriceHigh => b.price.amount.cmp(&a.price.amount),
    }
}
