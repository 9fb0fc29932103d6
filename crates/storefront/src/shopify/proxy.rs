//! Pass-through proxy for browser-side Storefront API calls.
//!
//! Requests are forwarded to the checkout domain without inspecting the
//! GraphQL payload. Status, headers and body come back as received.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, header};
use tracing::instrument;
use url::Url;

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::ShopifyError;

/// Headers that apply to a single connection and are never forwarded.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers, plus any listed in `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    for name in HOP_BY_HOP.iter().copied().chain(listed.iter().map(String::as_str)) {
        headers.remove(name);
    }
}

/// An upstream response, returned as received.
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Forwards Storefront API requests to the checkout domain.
#[derive(Debug, Clone)]
pub struct GraphqlProxy {
    client: reqwest::Client,
    origin: Url,
}

impl GraphqlProxy {
    /// Create a proxy for the configured checkout domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout domain is not a valid host or the
    /// HTTP client cannot be built.
    pub fn new(config: &ShopifyStorefrontConfig) -> Result<Self, ShopifyError> {
        let origin = Url::parse(&format!("https://{}", config.checkout_domain))?;
        Self::with_origin(origin, config.request_timeout)
    }

    /// Create a proxy forwarding to an explicit origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_origin(origin: Url, timeout: Duration) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, origin })
    }

    /// The URL requests for `version` are forwarded to.
    ///
    /// # Errors
    ///
    /// Returns an error if `version` does not form a valid path.
    pub fn target(&self, version: &str) -> Result<Url, ShopifyError> {
        Ok(self.origin.join(&format!("/api/{version}/graphql.json"))?)
    }

    /// Forward a request body and headers upstream.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Transport`] if the upstream cannot be reached.
    /// Upstream error statuses are not errors; they are returned as-is.
    #[instrument(skip(self, headers, body), fields(body_len = body.len()))]
    pub async fn forward(
        &self,
        version: &str,
        mut headers: HeaderMap,
        body: Bytes,
    ) -> Result<ProxiedResponse, ShopifyError> {
        let target = self.target(version)?;

        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);
        strip_hop_by_hop(&mut headers);

        let response = self
            .client
            .post(target)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let mut headers = response.headers().clone();
        strip_hop_by_hop(&mut headers);
        headers.remove(header::CONTENT_LENGTH);
        let body = response.bytes().await?;

        tracing::debug!(status = %status, "Proxied Storefront API request");

        Ok(ProxiedResponse {
            status,
            headers,
            body,
        })
    }
}
