//! Per-request Storefront context.
//!
//! Resolves the buyer locale from the request path and pairs it with the
//! store settings every Storefront call needs.

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use shopfront_core::Locale;

use crate::shopify::{LocalizedStorefront, StorefrontClient};
use crate::state::AppState;

/// Storefront settings for the current request.
///
/// Always extracts successfully: paths without a locale prefix get
/// [`Locale::DEFAULT`].
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub locale: Locale,
    pub store_domain: String,
    pub api_version: String,
    /// Public token, safe to hand to browsers.
    pub access_token: String,
}

impl RequestContext {
    /// Build the context for a request path.
    #[must_use]
    pub fn for_path(state: &AppState, path: &str) -> Self {
        let shopify = &state.config().shopify;
        Self {
            locale: Locale::from_path(path),
            store_domain: shopify.store_domain.clone(),
            api_version: shopify.api_version.clone(),
            access_token: shopify.storefront_public_token.clone(),
        }
    }

    /// The Storefront client bound to this request's locale.
    #[must_use]
    pub const fn storefront<'a>(&self, client: &'a StorefrontClient) -> LocalizedStorefront<'a> {
        client.localized(self.locale)
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped URI; the locale lives in the original
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |uri| uri.0.path());

        let context = Self::for_path(state, path);
        tracing::Span::current().record("locale", tracing::field::display(context.locale));
        Ok(context)
    }
}
