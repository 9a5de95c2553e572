//! Inspirational quotes shown alongside the signature wall.
//!
//! Each quote carries a category and an inspiration level from 1 to 5.
//! Random picks take the RNG as an argument so callers choose between
//! `rand::rng()` and a seeded generator.

use std::sync::LazyLock;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Default threshold for [`high_inspiration_quotes`].
pub const DEFAULT_MIN_INSPIRATION: u8 = 4;

/// A quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub text: String,
    pub author: String,
    pub category: String,
    pub inspiration: u8,
}

/// A quote category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteCategory {
    pub id: String,
    pub name: String,
}

static QUOTES: LazyLock<Vec<Quote>> = LazyLock::new(|| {
    [
        (
            "Love and goodwill are the foundation of all spiritual growth",
            "Thich Nhat Hanh",
            "mindfulness",
            5,
        ),
        (
            "The greatest gift you can give someone is your presence",
            "Thich Nhat Hanh",
            "mindfulness",
            5,
        ),
        ("Be the change you wish to see in the world", "Mahatma Gandhi", "action", 5),
        (
            "In the midst of movement and chaos, keep stillness inside of you",
            "Deepak Chopra",
            "peace",
            4,
        ),
        (
            "Love is not something you give or get; it is something that you are",
            "Marianne Williamson",
            "love",
            5,
        ),
        ("The way to get started is to quit talking and begin doing", "Walt Disney", "action", 4),
        ("Peace comes from within. Do not seek it without", "Buddha", "peace", 5),
        (
            "When you do things from your soul, you feel a river moving in you, a joy",
            "Rumi",
            "joy",
            5,
        ),
        ("The only way to do great work is to love what you do", "Steve Jobs", "passion", 4),
        (
            "Happiness is not something ready-made. It comes from your own actions",
            "Dalai Lama",
            "happiness",
            5,
        ),
        ("Every moment is a fresh beginning", "T.S. Eliot", "renewal", 4),
        (
            "The present moment is filled with joy and happiness. If you are attentive, you will see it",
            "Thich Nhat Hanh",
            "mindfulness",
            5,
        ),
        ("Love is the bridge between you and everything", "Rumi", "love", 5),
        (
            "Your task is not to seek for love, but merely to seek and find all the barriers within yourself that you have built against it",
            "Rumi",
            "love",
            5,
        ),
        (
            "The greatest glory in living lies not in never falling, but in rising every time we fall",
            "Nelson Mandela",
            "resilience",
            5,
        ),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (text, author, category, inspiration))| Quote {
        id: format!("quote-{}", i + 1),
        text: text.to_owned(),
        author: author.to_owned(),
        category: category.to_owned(),
        inspiration,
    })
    .collect()
});

static CATEGORIES: LazyLock<Vec<QuoteCategory>> = LazyLock::new(|| {
    [
        ("mindfulness", "Mindfulness"),
        ("love", "Love"),
        ("peace", "Peace"),
        ("action", "Action"),
        ("joy", "Joy"),
        ("passion", "Passion"),
        ("happiness", "Happiness"),
        ("renewal", "Renewal"),
        ("resilience", "Resilience"),
    ]
    .into_iter()
    .map(|(id, name)| QuoteCategory {
        id: id.to_owned(),
        name: name.to_owned(),
    })
    .collect()
});

/// Every quote, in table order.
#[must_use]
pub fn quotes() -> &'static [Quote] {
    &QUOTES
}

#[must_use]
pub fn quote_categories() -> &'static [QuoteCategory] {
    &CATEGORIES
}

#[must_use]
pub fn quote_by_id(id: &str) -> Option<&'static Quote> {
    QUOTES.iter().find(|q| q.id == id)
}

/// Any quote. `None` only if the table is empty.
pub fn random_quote<R: Rng + ?Sized>(rng: &mut R) -> Option<&'static Quote> {
    QUOTES.choose(rng)
}

/// A random quote from `category`.
///
/// Falls back to [`random_quote`] when no category is given or it has no
/// quotes.
pub fn quote_by_category<R: Rng + ?Sized>(
    category: Option<&str>,
    rng: &mut R,
) -> Option<&'static Quote> {
    let Some(category) = category.filter(|c| !c.is_empty()) else {
        return random_quote(rng);
    };

    let in_category: Vec<&'static Quote> =
        QUOTES.iter().filter(|q| q.category == category).collect();
    in_category
        .choose(rng)
        .copied()
        .or_else(|| random_quote(rng))
}

/// Quotes with an inspiration level of at least `min`.
pub fn high_inspiration_quotes(min: u8) -> impl Iterator<Item = &'static Quote> {
    QUOTES.iter().filter(move |q| q.inspiration >= min)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_table_shape() {
        assert_eq!(quotes().len(), 15);
        assert!(
            quotes()
                .iter()
                .all(|q| quote_categories().iter().any(|c| c.id == q.category))
        );
        assert!(quotes().iter().all(|q| (1..=5).contains(&q.inspiration)));
    }

    #[test]
    fn test_quote_by_id() {
        let quote = quote_by_id("quote-3").unwrap();
        assert_eq!(quote.author, "Mahatma Gandhi");
        assert!(quote_by_id("quote-16").is_none());
    }

    #[test]
    fn test_category_pick_stays_in_category() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let quote = quote_by_category(Some("love"), &mut rng).unwrap();
            assert_eq!(quote.category, "love");
        }
    }

    #[test]
    fn test_unknown_or_missing_category_falls_back() {
        let mut rng = StdRng::seed_from_u64(7);
        for category in [Some("sorrow"), Some(""), None] {
            let quote = quote_by_category(category, &mut rng).unwrap();
            assert!(quotes().contains(quote));
        }
    }

    #[test]
    fn test_high_inspiration_filter() {
        assert_eq!(high_inspiration_quotes(DEFAULT_MIN_INSPIRATION).count(), 15);
        assert_eq!(high_inspiration_quotes(5).count(), 11);
        assert!(high_inspiration_quotes(5).all(|q| q.inspiration == 5));
        assert_eq!(high_inspiration_quotes(6).count(), 0);
    }

    #[test]
    fn test_random_quote_varies() {
        let mut rng = StdRng::seed_from_u64(42);
        let picks: std::collections::HashSet<_> = (0..40)
            .map(|_| random_quote(&mut rng).unwrap().id.clone())
            .collect();
        assert!(picks.len() > 1);
    }
}
