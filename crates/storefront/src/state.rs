//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::messages::{InMemoryMessageStore, MessageStore};
use crate::shopify::{GraphqlProxy, ShopifyError, StorefrontClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the Shopify clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    proxy: GraphqlProxy,
    messages: Arc<dyn MessageStore>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the Shopify clients from `config`. Without a message store the
    /// in-memory one is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured Shopify domains are invalid.
    pub fn new(
        config: StorefrontConfig,
        messages: Option<Arc<dyn MessageStore>>,
        pool: Option<PgPool>,
    ) -> Result<Self, ShopifyError> {
        let storefront = StorefrontClient::new(&config.shopify)?;
        let proxy = GraphqlProxy::new(&config.shopify)?;
        let messages = messages.unwrap_or_else(|| Arc::new(InMemoryMessageStore::new()));

        Ok(Self::from_parts(config, storefront, proxy, messages, pool))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        storefront: StorefrontClient,
        proxy: GraphqlProxy,
        messages: Arc<dyn MessageStore>,
        pool: Option<PgPool>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                proxy,
                messages,
                pool,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get a reference to the Storefront API proxy.
    #[must_use]
    pub fn proxy(&self) -> &GraphqlProxy {
        &self.inner.proxy
    }

    /// Get the chat message store.
    #[must_use]
    pub fn messages(&self) -> &dyn MessageStore {
        self.inner.messages.as_ref()
    }

    /// Get the database pool, if a database is configured.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}

/// State pointing at an unreachable store, for tests that never call out.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn test_state() -> AppState {
    let config = StorefrontConfig::from_lookup(|key| match key {
        "SHOPIFY_STORE_DOMAIN" => Some("shop.test".to_string()),
        "SHOPIFY_STOREFRONT_PUBLIC_TOKEN" => Some("public-token".to_string()),
        _ => None,
    })
    .unwrap();
    AppState::new(config, None, None).unwrap()
}
