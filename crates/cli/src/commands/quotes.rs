//! Quote commands.

use rand::Rng;
use vible_core::quotes::{self, Quote};

/// A random quote, from `category` when it has any.
pub fn random<R: Rng + ?Sized>(category: Option<&str>, rng: &mut R) -> Option<&'static Quote> {
    quotes::quote_by_category(category, rng)
}

/// Quotes at or above `min_inspiration`, in table order.
#[must_use]
pub fn list(min_inspiration: u8) -> Vec<&'static Quote> {
    quotes::high_inspiration_quotes(min_inspiration).collect()
}

/// `"<text>" - <author> [<category>, <level>/5]`
#[must_use]
pub fn format_line(quote: &Quote) -> String {
    format!(
        "\"{}\" - {} [{}, {}/5]",
        quote.text, quote.author, quote.category, quote.inspiration
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_random_respects_category() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random(Some("peace"), &mut rng).unwrap().category, "peace");
        assert!(random(Some("nonsense"), &mut rng).is_some());
    }

    #[test]
    fn test_list_filters_by_inspiration() {
        let top = list(5);
        assert_eq!(top.len(), 11);
        assert_eq!(top.first().unwrap().id, "quote-1");
    }

    #[test]
    fn test_format_line() {
        let quote = quotes::quote_by_id("quote-11").unwrap();
        assert_eq!(
            format_line(quote),
            "\"Every moment is a fresh beginning\" - T.S. Eliot [renewal, 4/5]"
        );
    }
}
