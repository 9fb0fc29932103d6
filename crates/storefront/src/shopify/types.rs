//! Domain types for Shopify Storefront API responses.
//!
//! These types deserialize directly from the GraphQL `data` payload
//! (camelCase field names) and serialize back out in the same shape for the
//! JSON API. Connections (`{ nodes: [...] }`) are flattened into plain
//! vectors.

use serde::{Deserialize, Deserializer, Serialize};
use shopfront_core::{CartAttribute, CartId, CartLineId, CollectionId, ProductId, VariantId};

/// Deserialize a GraphQL connection (`{ "nodes": [...] }`) into its nodes.
fn nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    struct Connection<T> {
        nodes: Vec<T>,
    }

    Option::<Connection<T>>::deserialize(deserializer).map(|c| c.map(|c| c.nodes).unwrap_or_default())
}

// =============================================================================
// Money / Image / SEO
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

/// Product, variant or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Shopify image ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    #[serde(default)]
    pub alt_text: Option<String>,
    /// Image width in pixels.
    #[serde(default)]
    pub width: Option<i64>,
    /// Image height in pixels.
    #[serde(default)]
    pub height: Option<i64>,
}

/// SEO metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    /// Page title for search engines.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
}

/// Cursor pagination info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether more items follow.
    pub has_next_page: bool,
    /// Cursor to pass as `after` for the next page.
    pub end_cursor: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Selected value (e.g., "Large").
    pub value: String,
}

/// A purchasable product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    pub title: String,
    pub available_for_sale: bool,
    pub price: Money,
    #[serde(default)]
    pub compare_at_price: Option<Money>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    #[serde(default)]
    pub image: Option<Image>,
}

/// Full product detail for the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub featured_image: Option<Image>,
    #[serde(default, deserialize_with = "nodes")]
    pub images: Vec<Image>,
    pub price_range: PriceRange,
    #[serde(default, deserialize_with = "nodes")]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub seo: Option<Seo>,
}

/// Product card data used in grids, recommendations and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub featured_image: Option<Image>,
    pub price_range: PriceRange,
}

// =============================================================================
// Collection Types
// =============================================================================

/// Collection card data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub id: CollectionId,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub image: Option<Image>,
}

/// A page of products within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProducts {
    pub nodes: Vec<ProductSummary>,
    pub page_info: PageInfo,
}

/// Full collection detail for the collection page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub seo: Option<Seo>,
    pub products: CollectionProducts,
}

// =============================================================================
// Policy Types
// =============================================================================

/// A shop policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Policy ID (absent for default subscription policies).
    pub id: Option<String>,
    pub handle: String,
    pub title: String,
    /// Policy body as HTML.
    pub body: String,
    pub url: String,
}

/// The shop policies that can be addressed by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    PrivacyPolicy,
    ShippingPolicy,
    TermsOfService,
    RefundPolicy,
    SubscriptionPolicy,
}

impl PolicyKind {
    /// Look up a policy kind by its URL handle (`privacy-policy`).
    #[must_use]
    pub fn from_handle(handle: &str) -> Option<Self> {
        match handle {
            "privacy-policy" => Some(Self::PrivacyPolicy),
            "shipping-policy" => Some(Self::ShippingPolicy),
            "terms-of-service" => Some(Self::TermsOfService),
            "refund-policy" => Some(Self::RefundPolicy),
            "subscription-policy" => Some(Self::SubscriptionPolicy),
            _ => None,
        }
    }
}

/// All shop policies (each may be unset in the Shopify admin).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopPolicies {
    pub privacy_policy: Option<Policy>,
    pub shipping_policy: Option<Policy>,
    pub terms_of_service: Option<Policy>,
    pub refund_policy: Option<Policy>,
    pub subscription_policy: Option<Policy>,
}

impl ShopPolicies {
    /// Take a single policy by kind.
    #[must_use]
    pub fn take(self, kind: PolicyKind) -> Option<Policy> {
        match kind {
            PolicyKind::PrivacyPolicy => self.privacy_policy,
            PolicyKind::ShippingPolicy => self.shipping_policy,
            PolicyKind::TermsOfService => self.terms_of_service,
            PolicyKind::RefundPolicy => self.refund_policy,
            PolicyKind::SubscriptionPolicy => self.subscription_policy,
        }
    }

    /// The policies that are set, in display order.
    #[must_use]
    pub fn into_list(self) -> Vec<Policy> {
        [
            self.privacy_policy,
            self.shipping_policy,
            self.terms_of_service,
            self.refund_policy,
            self.subscription_policy,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

// =============================================================================
// Cart Types
// =============================================================================

/// Product info attached to cart merchandise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandiseProduct {
    pub handle: String,
    pub title: String,
}

/// The variant a cart line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandise {
    pub id: VariantId,
    pub title: String,
    pub price: Money,
    #[serde(default)]
    pub image: Option<Image>,
    pub product: CartMerchandiseProduct,
}

/// Cost of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCost {
    pub amount_per_quantity: Money,
    pub total_amount: Money,
}

/// One line item in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub quantity: i64,
    #[serde(default)]
    pub attributes: Vec<CartAttribute>,
    pub cost: CartLineCost,
    pub merchandise: CartMerchandise,
}

/// Cart totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: Money,
    pub total_amount: Money,
}

/// A Shopify cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub checkout_url: String,
    pub total_quantity: i64,
    #[serde(default)]
    pub note: Option<String>,
    pub cost: CartCost,
    #[serde(default, deserialize_with = "nodes")]
    pub lines: Vec<CartLine>,
}

/// Error returned in a cart mutation's `userErrors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUserError {
    /// Path to the input field that caused the error.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Payload shared by all cart mutations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<Cart>,
    #[serde(default)]
    pub user_errors: Vec<CartUserError>,
}

// =============================================================================
// Search Types
// =============================================================================

/// Full search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(deserialize_with = "nodes")]
    pub products: Vec<ProductSummary>,
    #[serde(deserialize_with = "nodes")]
    pub collections: Vec<CollectionSummary>,
}

/// A query suggestion from predictive search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuerySuggestion {
    pub text: String,
    /// Suggestion with the matched part wrapped in `<mark>`.
    pub styled_text: String,
}

/// Predictive (type-ahead) search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictiveSearchResults {
    #[serde(default)]
    pub products: Vec<ProductSummary>,
    #[serde(default)]
    pub collections: Vec<CollectionSummary>,
    #[serde(default)]
    pub queries: Vec<SearchQuerySuggestion>,
}

// =============================================================================
// Redirect Types
// =============================================================================

/// An entry in the shop's URL redirect table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRedirect {
    /// Source path (`/old-page`).
    pub path: String,
    /// Target path or URL.
    pub target: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn money(amount: &str) -> serde_json::Value {
        serde_json::json!({"amount": amount, "currencyCode": "USD"})
    }

    #[test]
    fn test_cart_flattens_line_connection() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Cart/c1",
            "checkoutUrl": "https://shop.example.com/cart/c/c1",
            "totalQuantity": 2,
            "note": null,
            "cost": {"subtotalAmount": money("20.0"), "totalAmount": money("21.5")},
            "lines": {"nodes": [{
                "id": "gid://shopify/CartLine/l1",
                "quantity": 2,
                "attributes": [],
                "cost": {"amountPerQuantity": money("10.0"), "totalAmount": money("20.0")},
                "merchandise": {
                    "id": "gid://shopify/ProductVariant/1",
                    "title": "Default Title",
                    "price": money("10.0"),
                    "image": null,
                    "product": {"handle": "tee", "title": "Tee"}
                }
            }]}
        }))
        .unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].id.as_str(), "gid://shopify/CartLine/l1");

        // Serialized back out as a flat array
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["lines"][0]["quantity"], 2);
        assert_eq!(json["cost"]["totalAmount"]["amount"], "21.5");
    }

    #[test]
    fn test_policy_kind_from_handle() {
        assert_eq!(
            PolicyKind::from_handle("terms-of-service"),
            Some(PolicyKind::TermsOfService)
        );
        assert_eq!(PolicyKind::from_handle("termsOfService"), None);
    }

    #[test]
    fn test_shop_policies_into_list_skips_unset() {
        let policy = Policy {
            id: Some("gid://shopify/ShopPolicy/1".to_string()),
            handle: "refund-policy".to_string(),
            title: "Refund policy".to_string(),
            body: "<p>30 days</p>".to_string(),
            url: "https://shop.example.com/policies/refund-policy".to_string(),
        };
        let policies = ShopPolicies {
            refund_policy: Some(policy.clone()),
            ..ShopPolicies::default()
        };
        assert_eq!(policies.clone().into_list(), vec![policy.clone()]);
        assert_eq!(policies.take(PolicyKind::RefundPolicy), Some(policy));
    }

    #[test]
    fn test_missing_connection_is_empty() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Product/1",
            "handle": "tee",
            "title": "Tee",
            "priceRange": {"minVariantPrice": money("10.0"), "maxVariantPrice": money("12.0")}
        }))
        .unwrap();
        assert!(product.variants.is_empty());
        assert!(product.images.is_empty());
    }
}
