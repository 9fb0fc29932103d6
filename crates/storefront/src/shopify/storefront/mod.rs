//! Shopify Storefront API client implementation.
//!
//! Named operations (see [`documents`]) are sent as `graphql_client`
//! [`QueryBody`] values; ad-hoc documents are sent without an operation
//! name. Responses are parsed with `graphql_client`'s wire types and the
//! `data` payload is deserialized into the caller's type. Nothing is cached.

mod cart;
mod catalog;
pub mod documents;

pub use cart::{CartLineInput, CartLineUpdate};
pub use documents::Operation;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{QueryBody, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shopfront_core::Locale;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::{ShopifyError, UrlRedirect};

/// Header carrying a public (browser-safe) Storefront token.
const PUBLIC_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";
/// Header carrying a private (server-only) Storefront token.
const PRIVATE_TOKEN_HEADER: &str = "Shopify-Storefront-Private-Token";

/// Maximum number of body characters kept in error values.
const ERROR_BODY_LIMIT: usize = 200;

// =============================================================================
// Options
// =============================================================================

/// Caching strategy requested by a caller.
///
/// Shopify is the source of truth and responses are never stored locally;
/// the hint is recorded in the request span only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHint {
    /// Data that changes often (carts, search).
    Short,
    /// Data that rarely changes (policies, collections).
    Long,
    /// Never cacheable.
    NoStore,
}

impl CacheHint {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
            Self::NoStore => "no-store",
        }
    }
}

/// Variables and cache hint for a single query.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// GraphQL variables.
    pub variables: Map<String, Value>,
    /// Caching hint (logged only).
    pub cache: Option<CacheHint>,
}

impl QueryOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    #[must_use]
    pub fn variable(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_owned(), value.into());
        self
    }

    /// Set the cache hint.
    #[must_use]
    pub const fn cache(mut self, hint: CacheHint) -> Self {
        self.cache = Some(hint);
        self
    }
}

/// Credentials used to authenticate Storefront requests.
pub enum StorefrontAuth {
    /// Public token, sent as `X-Shopify-Storefront-Access-Token`.
    Public(String),
    /// Private token, sent as `Shopify-Storefront-Private-Token`.
    Private(SecretString),
}

impl StorefrontAuth {
    /// Pick the private token when one is configured, otherwise the public one.
    #[must_use]
    pub fn from_config(config: &ShopifyStorefrontConfig) -> Self {
        config.storefront_private_token.as_ref().map_or_else(
            || Self::Public(config.storefront_public_token.clone()),
            |token| Self::Private(SecretString::from(token.expose_secret().to_owned())),
        )
    }

    fn header(&self) -> (&'static str, &str) {
        match self {
            Self::Public(token) => (PUBLIC_TOKEN_HEADER, token),
            Self::Private(token) => (PRIVATE_TOKEN_HEADER, token.expose_secret()),
        }
    }
}

impl std::fmt::Debug for StorefrontAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public(_) => f.write_str("Public([REDACTED])"),
            Self::Private(_) => f.write_str("Private([REDACTED])"),
        }
    }
}

/// Request body for a document sent without an operation name.
#[derive(Serialize)]
struct DocumentBody<'a> {
    query: &'a str,
    variables: &'a Map<String, Value>,
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheap to clone; one instance is built at startup and shared by all
/// requests.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: Url,
    auth: StorefrontAuth,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store domain does not form a valid URL or the
    /// HTTP client cannot be built.
    pub fn new(config: &ShopifyStorefrontConfig) -> Result<Self, ShopifyError> {
        let endpoint = Url::parse(&format!(
            "https://{}/api/{}/graphql.json",
            config.store_domain, config.api_version
        ))?;

        Self::with_endpoint(endpoint, StorefrontAuth::from_config(config), config.request_timeout)
    }

    /// Create a client bound to an explicit GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_endpoint(
        endpoint: Url,
        auth: StorefrontAuth,
        timeout: Duration,
    ) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                endpoint,
                auth,
            }),
        })
    }

    /// A view of this client that runs queries in the given locale.
    #[must_use]
    pub const fn localized(&self, locale: Locale) -> LocalizedStorefront<'_> {
        LocalizedStorefront {
            client: self,
            locale,
        }
    }

    /// Execute a document and deserialize its `data` into `T`.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::query_raw`]; additionally returns
    /// [`ShopifyError::Parse`] if `data` does not match `T`.
    pub async fn query<T: DeserializeOwned>(
        &self,
        document: &str,
        options: QueryOptions,
    ) -> Result<T, ShopifyError> {
        let data = self.query_raw(document, options).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Execute a document and return its `data` untouched.
    ///
    /// No `operationName` is sent, so the document must define a single
    /// operation (named or anonymous).
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::Transport`] on network, DNS or timeout failure
    /// - [`ShopifyError::RateLimited`] on HTTP 429
    /// - [`ShopifyError::Status`] on any other non-success status
    /// - [`ShopifyError::Parse`] if the body is not a GraphQL response
    /// - [`ShopifyError::GraphQL`] if the response has an `errors` array
    /// - [`ShopifyError::MissingData`] if it has neither `data` nor `errors`
    pub async fn query_raw(
        &self,
        document: &str,
        options: QueryOptions,
    ) -> Result<Value, ShopifyError> {
        let body = DocumentBody {
            query: document,
            variables: &options.variables,
        };
        self.send(&body, "anonymous", options.cache).await
    }

    /// Execute a named operation and deserialize its `data` into `T`.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::query`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        operation: Operation,
        options: QueryOptions,
    ) -> Result<T, ShopifyError> {
        let body = QueryBody {
            variables: &options.variables,
            query: operation.document,
            operation_name: operation.name,
        };
        let data = self.send(&body, operation.name, options.cache).await?;
        Ok(serde_json::from_value(data)?)
    }

    #[instrument(
        skip(self, body, cache),
        fields(cache = cache.map_or("none", CacheHint::as_str))
    )]
    async fn send<B: Serialize + Sync>(
        &self,
        body: &B,
        operation: &str,
        cache: Option<CacheHint>,
    ) -> Result<Value, ShopifyError> {
        let (header, token) = self.inner.auth.header();

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header(header, token)
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                body: truncate(&response_text),
            });
        }

        let response: Response<Value> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&response_text),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(errors.into()));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %truncate(&response_text),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::MissingData
        })
    }

    /// Look up a path in the shop's URL redirect table.
    ///
    /// Returns the redirect target, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn url_redirect(&self, path: &str) -> Result<Option<String>, ShopifyError> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            url_redirects: Connection,
        }
        #[derive(serde::Deserialize)]
        struct Connection {
            nodes: Vec<UrlRedirect>,
        }

        let data: Data = self
            .execute(
                documents::URL_REDIRECTS,
                QueryOptions::new()
                    .variable("query", format!("path:{path}"))
                    .cache(CacheHint::Long),
            )
            .await?;

        Ok(data
            .url_redirects
            .nodes
            .into_iter()
            .next()
            .map(|redirect| redirect.target))
    }
}

// =============================================================================
// LocalizedStorefront
// =============================================================================

/// A [`StorefrontClient`] bound to a buyer locale.
///
/// Operations declaring `$country` / `$language` (the `@inContext`
/// convention) get those variables filled from the locale unless the caller
/// set them.
#[derive(Debug, Clone, Copy)]
pub struct LocalizedStorefront<'a> {
    client: &'a StorefrontClient,
    locale: Locale,
}

impl LocalizedStorefront<'_> {
    /// The locale queries run in.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    fn with_context(&self, document: &str, mut options: QueryOptions) -> QueryOptions {
        if document.contains("$country") {
            options
                .variables
                .entry("country")
                .or_insert_with(|| Value::from(self.locale.country.as_str()));
        }
        if document.contains("$language") {
            options
                .variables
                .entry("language")
                .or_insert_with(|| Value::from(self.locale.language.as_str()));
        }
        options
    }

    /// Execute a named operation in this locale.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::execute`].
    pub async fn query<T: DeserializeOwned>(
        &self,
        operation: Operation,
        options: QueryOptions,
    ) -> Result<T, ShopifyError> {
        let options = self.with_context(operation.document, options);
        self.client.execute(operation, options).await
    }
}
