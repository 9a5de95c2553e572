//! Catalog commands.

use vible_core::catalog::{self, Product, SortOrder};

/// Products matching `search` in `category`, in `sort` order.
#[must_use]
pub fn list(search: &str, category: Option<&str>, sort: SortOrder) -> Vec<&'static Product> {
    catalog::search(search, category, sort)
}

/// One line per product: `<id>  <name>  <price>  <category>`.
#[must_use]
pub fn format_line(product: &Product) -> String {
    let stock = if product.in_stock { "" } else { "  (out of stock)" };
    format!(
        "{:<24}{:<32}{:>10}  {}{stock}",
        product.id.as_str(),
        product.name,
        product.price.display(),
        product.category
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_sorted_by_price() {
        let products = list("", None, SortOrder::PriceHigh);
        assert_eq!(products.len(), catalog::products().len());
        assert!(
            products
                .windows(2)
                .all(|w| w[0].price.amount >= w[1].price.amount)
        );
    }

    #[test]
    fn test_format_line_contains_price() {
        let product = list("", None, SortOrder::Name)[0];
        let line = format_line(product);
        assert!(line.starts_with(product.id.as_str()));
        assert!(line.contains(&product.price.display()));
    }
}
