//! Session middleware configuration.
//!
//! The visitor session holds the Shopify cart ID. Any `tower-sessions` store
//! works: `PostgreSQL` in production, memory when no database is configured.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shopfront_session";

/// Session expiry time in seconds (14 days, matching Shopify cart lifetime).
const SESSION_EXPIRY_SECONDS: i64 = 14 * 24 * 60 * 60;

/// Create the session layer for the given store.
///
/// Cookies are `Secure` when the storefront is served over HTTPS.
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    config: &StorefrontConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Keys of values stored in the visitor session.
pub mod keys {
    /// Key for storing the Shopify cart ID.
    pub const CART_ID: &str = "cart_id";
}
