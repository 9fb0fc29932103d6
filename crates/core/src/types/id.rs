//! Newtype IDs for type-safe entity references.
//!
//! Shopify identifies everything with opaque global IDs
//! (`gid://shopify/ProductVariant/123`). Use the `define_id!` macro to create
//! type-safe wrappers that prevent accidentally passing a cart line ID where a
//! variant ID is expected.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use shopfront_core::define_id;
/// define_id!(ShopId);
/// define_id!(LocationId);
///
/// let shop = ShopId::new("gid://shopify/Shop/1");
/// assert_eq!(shop.as_str(), "gid://shopify/Shop/1");
///
/// // These are different types, so this won't compile:
/// // let _: LocationId = shop;
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

            /// Get the underlying ID string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the ID string.
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

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Shopify global IDs
define_id!(CartId);
define_id!(CartLineId);
define_id!(VariantId);
define_id!(ProductId);
define_id!(CollectionId);

// Local IDs
define_id!(ConversationId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrips_as_plain_string() {
        let id = CartLineId::new("gid://shopify/CartLine/1?cart=abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""gid://shopify/CartLine/1?cart=abc""#);

        let parsed: CartLineId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_display_and_conversions() {
        let id = VariantId::from("gid://shopify/ProductVariant/42");
        assert_eq!(id.to_string(), "gid://shopify/ProductVariant/42");
        assert_eq!(String::from(id.clone()), id.into_inner());
    }
}
