//! Cart mutation requests.
//!
//! The storefront owns no cart state: every mutation is forwarded to Shopify.
//! What it does own is validation of the inbound request, which arrives as a
//! loosely-typed JSON body and is converted into the closed [`CartAction`]
//! enum before anything is sent upstream.

use serde::{Deserialize, Serialize};

use crate::{CartLineId, VariantId};

/// Errors produced when a [`CartRequest`] cannot become a [`CartAction`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartActionError {
    /// The `action` discriminator is missing or unknown.
    #[error("Invalid action")]
    InvalidAction,
    /// `add` without a non-empty `variantId`.
    #[error("variantId is required")]
    MissingVariantId,
    /// `update` or `remove` without a non-empty `lineId`.
    #[error("lineId is required")]
    MissingLineId,
    /// `update` without a `quantity`.
    #[error("quantity is required")]
    MissingQuantity,
}

/// A custom key/value attribute attached to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAttribute {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: String,
}

/// Raw cart request body as posted by the client.
///
/// ```json
/// {"action": "add", "variantId": "gid://shopify/ProductVariant/1", "quantity": 2}
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    /// `add`, `update` or `remove`.
    pub action: Option<String>,
    /// Variant to add (for `add`).
    pub variant_id: Option<String>,
    /// Line quantity. Optional for `add` (defaults to 1), required for `update`.
    pub quantity: Option<u32>,
    /// Cart line to change (for `update` and `remove`).
    pub line_id: Option<String>,
    /// Line attributes (for `add`).
    pub attributes: Option<Vec<CartAttribute>>,
}

/// A validated cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add a variant to the cart (creating the cart if needed).
    Add {
        variant_id: VariantId,
        quantity: u32,
        attributes: Vec<CartAttribute>,
    },
    /// Set a line's quantity. A quantity of 0 removes the line upstream.
    Update { line_id: CartLineId, quantity: u32 },
    /// Remove a line.
    Remove { line_id: CartLineId },
}

impl CartAction {
    /// Quantity used for `add` when none is given.
    pub const DEFAULT_ADD_QUANTITY: u32 = 1;

    /// The wire name of the action.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Remove { .. } => "remove",
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<CartRequest> for CartAction {
    type Error = CartActionError;

    fn try_from(request: CartRequest) -> Result<Self, Self::Error> {
        match request.action.as_deref() {
            Some("add") => {
                let variant_id =
                    non_empty(request.variant_id).ok_or(CartActionError::MissingVariantId)?;
                Ok(Self::Add {
                    variant_id: VariantId::new(variant_id),
                    quantity: request.quantity.unwrap_or(Self::DEFAULT_ADD_QUANTITY),
                    attributes: request.attributes.unwrap_or_default(),
                })
            }
            Some("update") => {
                let line_id = non_empty(request.line_id).ok_or(CartActionError::MissingLineId)?;
                let quantity = request.quantity.ok_or(CartActionError::MissingQuantity)?;
                Ok(Self::Update {
                    line_id: CartLineId::new(line_id),
                    quantity,
                })
            }
            Some("remove") => {
                let line_id = non_empty(request.line_id).ok_or(CartActionError::MissingLineId)?;
                Ok(Self::Remove {
                    line_id: CartLineId::new(line_id),
                })
            }
            _ => Err(CartActionError::InvalidAction),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<CartAction, CartActionError> {
        let request: CartRequest = serde_json::from_str(json).unwrap();
        CartAction::try_from(request)
    }

    #[test]
    fn test_add_defaults_quantity() {
        let action = parse(r#"{"action":"add","variantId":"gid://shopify/ProductVariant/1"}"#);
        assert_eq!(
            action.unwrap(),
            CartAction::Add {
                variant_id: VariantId::new("gid://shopify/ProductVariant/1"),
                quantity: 1,
                attributes: vec![],
            }
        );
    }

    #[test]
    fn test_add_with_attributes() {
        let action = parse(
            r#"{"action":"add","variantId":"v1","quantity":3,"attributes":[{"key":"engraving","value":"AW"}]}"#,
        )
        .unwrap();
        let CartAction::Add {
            quantity,
            attributes,
            ..
        } = action
        else {
            panic!("expected add");
        };
        assert_eq!(quantity, 3);
        assert_eq!(attributes[0].key, "engraving");
    }

    #[test]
    fn test_add_requires_variant() {
        assert_eq!(
            parse(r#"{"action":"add"}"#),
            Err(CartActionError::MissingVariantId)
        );
        assert_eq!(
            parse(r#"{"action":"add","variantId":"  "}"#),
            Err(CartActionError::MissingVariantId)
        );
    }

    #[test]
    fn test_update_allows_zero_quantity() {
        assert_eq!(
            parse(r#"{"action":"update","lineId":"L1","quantity":0}"#),
            Ok(CartAction::Update {
                line_id: CartLineId::new("L1"),
                quantity: 0,
            })
        );
    }

    #[test]
    fn test_update_requires_line_and_quantity() {
        assert_eq!(
            parse(r#"{"action":"update","quantity":2}"#),
            Err(CartActionError::MissingLineId)
        );
        assert_eq!(
            parse(r#"{"action":"update","lineId":"L1"}"#),
            Err(CartActionError::MissingQuantity)
        );
    }

    #[test]
    fn test_remove_requires_line() {
        assert_eq!(
            parse(r#"{"action":"remove"}"#),
            Err(CartActionError::MissingLineId)
        );
        assert_eq!(parse(r#"{"action":"remove","lineId":"L9"}"#).unwrap().name(), "remove");
    }

    #[test]
    fn test_invalid_action() {
        assert_eq!(parse(r#"{"action":"clear"}"#), Err(CartActionError::InvalidAction));
        assert_eq!(parse("{}"), Err(CartActionError::InvalidAction));
        assert_eq!(CartActionError::InvalidAction.to_string(), "Invalid action");
    }
}
