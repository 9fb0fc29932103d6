//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Pages (also mounted under /{locale}, e.g. /fr-ca/products/tee)
//! GET  /                               - Featured collection and recommendations
//! GET  /products/{handle}              - Product detail
//! GET  /collections/{handle}           - Collection detail (?cursor=)
//! GET  /policies                       - All shop policies
//! GET  /policies/{handle}              - Single policy
//!
//! # API
//! GET  /api/cart                       - Current session cart
//! POST /api/cart                       - Cart mutation (add / update / remove)
//! GET  /api/search                     - Product and collection search
//! GET  /api/search/predictive          - Type-ahead suggestions
//! POST /api/{version}/graphql.json     - Storefront API pass-through
//! GET  /api/messages/{conversation_id} - Conversation messages
//! POST /api/messages/{conversation_id} - Append a message
//! ```
//!
//! Anything else is a 404, subject to the redirect policy.

pub mod cart;
pub mod messages;
pub mod pages;
pub mod proxy;
pub mod search;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/products/{handle}", get(pages::product))
        .route("/collections/{handle}", get(pages::collection))
        .route("/policies", get(pages::policies))
        .route("/policies/{handle}", get(pages::policy))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).post(cart::mutate))
        .route("/search", get(search::search))
        .route("/search/predictive", get(search::predictive))
        .route("/{version}/graphql.json", post(proxy::graphql))
        .route(
            "/messages/{conversation_id}",
            get(messages::list).post(messages::append),
        )
}

/// Unmatched paths.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .nest("/{locale}", page_routes())
        .nest("/api", api_routes())
        .fallback(not_found)
}
