//! Cart operations.
//!
//! Carts live entirely upstream; every call here is a Storefront API round
//! trip. Mutation `userErrors` become [`ShopifyError::UserError`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use shopfront_core::{CartAttribute, CartId, CartLineId, VariantId};
use tracing::instrument;

use super::{CacheHint, LocalizedStorefront, Operation, QueryOptions, documents};
use crate::shopify::{Cart, CartMutationPayload, ShopifyError};

/// A line to add to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineInput {
    pub variant_id: VariantId,
    pub quantity: u32,
    pub attributes: Vec<CartAttribute>,
}

impl CartLineInput {
    fn to_json(&self) -> serde_json::Value {
        json!({
            "merchandiseId": self.variant_id,
            "quantity": self.quantity,
            "attributes": self.attributes,
        })
    }
}

/// A quantity change for an existing cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineUpdate {
    pub line_id: CartLineId,
    pub quantity: u32,
}

impl CartLineUpdate {
    fn to_json(&self) -> serde_json::Value {
        json!({"id": self.line_id, "quantity": self.quantity})
    }
}

/// Unwrap a mutation payload, turning `userErrors` into an error.
fn into_cart(payload: CartMutationPayload) -> Result<Cart, ShopifyError> {
    if !payload.user_errors.is_empty() {
        let message = payload
            .user_errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ShopifyError::UserError(message));
    }

    payload.cart.ok_or(ShopifyError::MissingData)
}

/// Mutation responses have a single root field holding the payload.
fn single_root<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, ShopifyError> {
    let serde_json::Value::Object(map) = data else {
        return Err(ShopifyError::MissingData);
    };
    let payload = map.into_iter().next().ok_or(ShopifyError::MissingData)?.1;
    Ok(serde_json::from_value(payload)?)
}

impl LocalizedStorefront<'_> {
    async fn mutate_cart(
        &self,
        operation: Operation,
        options: QueryOptions,
    ) -> Result<Cart, ShopifyError> {
        let data = self
            .query::<serde_json::Value>(operation, options.cache(CacheHint::NoStore))
            .await?;
        into_cart(single_root(data)?)
    }

    /// Fetch a cart. Returns `None` if the cart no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn cart(&self, cart_id: &CartId) -> Result<Option<Cart>, ShopifyError> {
        #[derive(Deserialize)]
        struct Data {
            cart: Option<Cart>,
        }

        let data: Data = self
            .query(
                documents::CART,
                QueryOptions::new()
                    .variable("cartId", cart_id.as_str())
                    .cache(CacheHint::NoStore),
            )
            .await?;
        Ok(data.cart)
    }

    /// Create a cart, optionally with initial lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the input.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn create_cart(&self, lines: &[CartLineInput]) -> Result<Cart, ShopifyError> {
        let lines: Vec<_> = lines.iter().map(CartLineInput::to_json).collect();
        self.mutate_cart(
            documents::CART_CREATE,
            QueryOptions::new().variable("input", json!({ "lines": lines })),
        )
        .await
    }

    /// Add lines to an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the input.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id, lines = lines.len()))]
    pub async fn add_lines(
        &self,
        cart_id: &CartId,
        lines: &[CartLineInput],
    ) -> Result<Cart, ShopifyError> {
        let lines: Vec<_> = lines.iter().map(CartLineInput::to_json).collect();
        self.mutate_cart(
            documents::CART_LINES_ADD,
            QueryOptions::new()
                .variable("cartId", cart_id.as_str())
                .variable("lines", lines),
        )
        .await
    }

    /// Change line quantities. A quantity of 0 removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the input.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id, lines = lines.len()))]
    pub async fn update_lines(
        &self,
        cart_id: &CartId,
        lines: &[CartLineUpdate],
    ) -> Result<Cart, ShopifyError> {
        let lines: Vec<_> = lines.iter().map(CartLineUpdate::to_json).collect();
        self.mutate_cart(
            documents::CART_LINES_UPDATE,
            QueryOptions::new()
                .variable("cartId", cart_id.as_str())
                .variable("lines", lines),
        )
        .await
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the input.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id, lines = line_ids.len()))]
    pub async fn remove_lines(
        &self,
        cart_id: &CartId,
        line_ids: &[CartLineId],
    ) -> Result<Cart, ShopifyError> {
        let ids: Vec<&str> = line_ids.iter().map(CartLineId::as_str).collect();
        self.mutate_cart(
            documents::CART_LINES_REMOVE,
            QueryOptions::new()
                .variable("cartId", cart_id.as_str())
                .variable("lineIds", ids),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::CartUserError;

    #[test]
    fn test_line_input_json() {
        let line = CartLineInput {
            variant_id: VariantId::new("gid://shopify/ProductVariant/1"),
            quantity: 2,
            attributes: vec![CartAttribute {
                key: "gift".to_string(),
                value: "yes".to_string(),
            }],
        };
        assert_eq!(
            line.to_json(),
            json!({
                "merchandiseId": "gid://shopify/ProductVariant/1",
                "quantity": 2,
                "attributes": [{"key": "gift", "value": "yes"}]
            })
        );
    }

    #[test]
    fn test_user_errors_are_joined() {
        let payload = CartMutationPayload {
            cart: None,
            user_errors: vec![
                CartUserError {
                    field: Some(vec!["lines".to_string()]),
                    message: "Merchandise does not exist".to_string(),
                    code: Some("INVALID".to_string()),
                },
                CartUserError {
                    field: None,
                    message: "Quantity too high".to_string(),
                    code: None,
                },
            ],
        };
        let err = into_cart(payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "User error: Merchandise does not exist; Quantity too high"
        );
    }

    #[test]
    fn test_single_root_requires_object() {
        let err = single_root::<CartMutationPayload>(json!(null)).unwrap_err();
        assert!(matches!(err, ShopifyError::MissingData));

        let payload: CartMutationPayload =
            single_root(json!({"cartLinesRemove": {"cart": null, "userErrors": []}})).unwrap();
        assert!(payload.cart.is_none());
        assert!(matches!(into_cart(payload), Err(ShopifyError::MissingData)));
    }
}
