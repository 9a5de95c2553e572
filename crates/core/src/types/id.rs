//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe string ID wrappers that
//! prevent accidentally mixing IDs from different entity types.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use vible_core::define_id;
/// define_id!(OrderId);
/// define_id!(ReviewId);
///
/// let order_id = OrderId::new("order-1");
/// let review_id = ReviewId::new("order-1");
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = review_id;
/// assert_eq!(order_id.as_str(), review_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(LineItemId);
define_id!(SignatureId);

/// Length of the random base-36 suffix in generated signature IDs.
const SIGNATURE_SUFFIX_LEN: usize = 9;

impl SignatureId {
    /// Generate a process-unique signature ID.
    ///
    /// Format: `sig_<unix-millis>_<9 random base-36 chars>`.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..SIGNATURE_SUFFIX_LEN)
            .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
            .collect();

        Self(format!("sig_{}_{suffix}", now.timestamp_millis()))
    }
}

impl LineItemId {
    /// Build the cart line ID for a product and optional size.
    ///
    /// The same product in different sizes occupies different cart lines.
    #[must_use]
    pub fn for_product(product_id: &ProductId, size: Option<&str>) -> Self {
        match size {
            Some(size) if !size.trim().is_empty() => {
                Self(format!("{}-{}", product_id.as_str(), size.trim()))
            }
            _ => Self(product_id.as_str().to_owned()),
        }
    }
}
