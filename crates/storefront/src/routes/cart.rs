//! Cart route handlers.
//!
//! Carts are owned by Shopify; the session only remembers the cart ID.
//! `POST /api/cart` takes `{action, variantId?, quantity?, lineId?,
//! attributes?}` and returns `{cart}` as received from Shopify.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use shopfront_core::{CartAction, CartId, CartRequest};
use tower_sessions::Session;
use tracing::instrument;

use crate::context::RequestContext;
use crate::error::{AppError, Result};
use crate::middleware::session_keys;
use crate::shopify::{Cart, CartLineInput, CartLineUpdate, ShopifyError};
use crate::state::AppState;

/// Cart API response body.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Option<Cart>,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart ID from the session.
async fn get_cart_id(session: &Session) -> Option<CartId> {
    session
        .get::<CartId>(session_keys::CART_ID)
        .await
        .ok()
        .flatten()
}

/// Set the cart ID in the session.
async fn set_cart_id(session: &Session, cart_id: &CartId) -> Result<()> {
    session
        .insert(session_keys::CART_ID, cart_id)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save cart ID to session: {e}")))
}

/// Cart mutations surface upstream failures to the client.
fn upstream(action: &'static str) -> impl Fn(ShopifyError) -> AppError {
    move |e| {
        tracing::warn!(action, error = %e, "Cart mutation failed");
        AppError::BadRequest(e.to_string())
    }
}

fn no_cart() -> AppError {
    AppError::BadRequest("No cart found".to_string())
}

// =============================================================================
// Handlers
// =============================================================================

/// Get the session's cart. `{cart: null}` when there is none or it cannot be
/// fetched.
#[instrument(skip_all, fields(locale = %context.locale))]
pub async fn show(
    State(state): State<AppState>,
    context: RequestContext,
    session: Session,
) -> Json<CartResponse> {
    let Some(cart_id) = get_cart_id(&session).await else {
        return Json(CartResponse { cart: None });
    };

    let cart = match context.storefront(state.storefront()).cart(&cart_id).await {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!(cart_id = %cart_id, error = %e, "Failed to fetch cart");
            None
        }
    };

    Json(CartResponse { cart })
}

/// Apply a cart mutation.
///
/// `add` creates a cart when the session has none. Invalid requests are
/// rejected before anything is sent to Shopify.
///
/// # Errors
///
/// - 400 for malformed JSON, an unknown action or missing fields
/// - 400 `No cart found` for `update` / `remove` without a cart
/// - 400 with the upstream message when Shopify rejects the mutation
#[instrument(
    skip_all,
    fields(locale = %context.locale, action = tracing::field::Empty)
)]
pub async fn mutate(
    State(state): State<AppState>,
    context: RequestContext,
    session: Session,
    body: std::result::Result<Json<CartRequest>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let action = CartAction::try_from(request).map_err(|e| AppError::Validation(e.to_string()))?;

    tracing::Span::current().record("action", action.name());

    let storefront = context.storefront(state.storefront());
    let cart_id = get_cart_id(&session).await;

    let cart = match action {
        CartAction::Add {
            variant_id,
            quantity,
            attributes,
        } => {
            let lines = [CartLineInput {
                variant_id,
                quantity,
                attributes,
            }];

            let cart = match &cart_id {
                Some(id) => storefront.add_lines(id, &lines).await,
                None => storefront.create_cart(&lines).await,
            }
            .map_err(upstream("add"))?;

            if cart_id.as_ref() != Some(&cart.id) {
                set_cart_id(&session, &cart.id).await?;
            }
            cart
        }
        CartAction::Update { line_id, quantity } => {
            let cart_id = cart_id.ok_or_else(no_cart)?;
            storefront
                .update_lines(&cart_id, &[CartLineUpdate { line_id, quantity }])
                .await
                .map_err(upstream("update"))?
        }
        CartAction::Remove { line_id } => {
            let cart_id = cart_id.ok_or_else(no_cart)?;
            storefront
                .remove_lines(&cart_id, &[line_id])
                .await
                .map_err(upstream("remove"))?
        }
    };

    Ok(Json(CartResponse { cart: Some(cart) }))
}
