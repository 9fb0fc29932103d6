//! Shopify Storefront API client and GraphQL proxy.
//!
//! # Architecture
//!
//! - GraphQL documents live in `graphql/storefront/*.graphql` and are paired
//!   with their operation names in [`documents`]; `graphql_client` provides
//!   the request body and the wire types for responses and errors, `reqwest`
//!   does the HTTP
//! - Shopify is source of truth - NO local sync, NO local cache, direct API
//!   calls on every request
//! - One [`StorefrontClient`] is built at startup and shared by all requests
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_server::shopify::{QueryOptions, StorefrontClient};
//!
//! let client = StorefrontClient::new(&config.shopify)?;
//!
//! // Raw query
//! let data: serde_json::Value = client
//!     .query("query { shop { name } }", QueryOptions::new())
//!     .await?;
//!
//! // Locale-aware typed operations
//! let product = client.localized(locale).product("my-product").await?;
//! ```

mod proxy;
mod storefront;
pub mod types;

pub use proxy::{GraphqlProxy, ProxiedResponse};
pub use storefront::{
    CacheHint, CartLineInput, CartLineUpdate, LocalizedStorefront, Operation, QueryOptions,
    StorefrontAuth, StorefrontClient, documents,
};
pub use types::*;

use std::fmt;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Network, DNS, TLS or timeout failure talking to Shopify.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// GraphQL response carried an `errors` array.
    #[error("GraphQL errors: {0}")]
    GraphQL(GraphQLErrors),

    /// Shopify answered with a non-success HTTP status.
    #[error("Shopify returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response had neither `data` nor `errors`.
    #[error("No data in response")]
    MissingData,

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// The configured endpoint is not a valid URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// The `errors` array of a GraphQL response.
///
/// Displays as the JSON-serialized list so that the original structure can
/// be recovered from the error message.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLErrors(pub Vec<graphql_client::Error>);

impl GraphQLErrors {
    /// The error messages, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    /// The errors as a JSON array.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.0).unwrap_or_default()
    }

    /// Recover the error list from its serialized form.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a GraphQL `errors` array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self)
    }
}

impl fmt::Display for GraphQLErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{} error(s)", self.0.len()),
        }
    }
}

impl From<Vec<graphql_client::Error>> for GraphQLErrors {
    fn from(errors: Vec<graphql_client::Error>) -> Self {
        Self(errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn errors_json() -> serde_json::Value {
        serde_json::json!([
            {
                "message": "Field 'titel' doesn't exist on type 'Product'",
                "locations": [{"line": 1, "column": 23}],
                "path": ["query", "product", "titel"],
                "extensions": {"code": "undefinedField", "typeName": "Product"}
            },
            {
                "message": "Throttled",
                "locations": [{"line": 3, "column": 5}],
                "path": ["products", 0],
                "extensions": {"code": "THROTTLED"}
            }
        ])
    }

    #[test]
    fn test_graphql_error_message_roundtrips() {
        let errors: Vec<graphql_client::Error> = serde_json::from_value(errors_json()).unwrap();
        let err = ShopifyError::GraphQL(errors.into());

        let message = err.to_string();
        let serialized = message.strip_prefix("GraphQL errors: ").unwrap();

        let recovered: serde_json::Value = serde_json::from_str(serialized).unwrap();
        assert_eq!(recovered, errors_json());

        let parsed = GraphQLErrors::from_json(serialized).unwrap();
        assert_eq!(
            parsed.messages(),
            vec!["Field 'titel' doesn't exist on type 'Product'", "Throttled"]
        );
    }

    #[test]
    fn test_graphql_errors_to_json() {
        let errors: Vec<graphql_client::Error> = serde_json::from_value(errors_json()).unwrap();
        assert_eq!(GraphQLErrors(errors).to_json(), errors_json());
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::GraphQL(GraphQLErrors(vec![]));
        assert_eq!(err.to_string(), "GraphQL errors: []");
    }

    #[test]
    fn test_status_error_display() {
        let err = ShopifyError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Shopify returned HTTP 502: bad gateway");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
