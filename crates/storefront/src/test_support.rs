//! In-process app harness for route tests.
//!
//! Builds the full router (sessions, redirects, request IDs) against a
//! wiremock server standing in for both the Storefront API and checkout.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use url::Url;
use wiremock::MockServer;

use crate::config::StorefrontConfig;
use crate::messages::InMemoryMessageStore;
use crate::middleware::session::SESSION_COOKIE_NAME;
use crate::shopify::{GraphqlProxy, StorefrontAuth, StorefrontClient};
use crate::state::AppState;

pub const API_VERSION: &str = "2026-01";

pub struct TestApp {
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestApp {
    pub fn new(server: &MockServer) -> Self {
        Self::with_timeout(server, Duration::from_secs(5))
    }

    /// App whose upstream requests give up after `timeout`.
    pub fn with_timeout(server: &MockServer, timeout: Duration) -> Self {
        Self {
            router: crate::app(state(server, timeout), MemoryStore::default()),
        }
    }

    /// Only `routes`, wrapped in the storefront middleware.
    pub fn with_routes(server: &MockServer, routes: Router<AppState>) -> Self {
        let state = state(server, Duration::from_secs(5));
        Self {
            router: crate::with_layers(routes, state, MemoryStore::default()),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.post_raw(uri, &body.to_string()).await
    }

    pub async fn post_json_with_cookie(&self, uri: &str, body: &Value, cookie: &str) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, cookie)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

/// State whose Storefront API and checkout are both `server`.
fn state(server: &MockServer, timeout: Duration) -> AppState {
    let config = StorefrontConfig::from_lookup(|key| match key {
        "SHOPIFY_STORE_DOMAIN" => Some("shop.test".to_string()),
        "SHOPIFY_STOREFRONT_PUBLIC_TOKEN" => Some("public-token".to_string()),
        _ => None,
    })
    .unwrap();

    let endpoint = Url::parse(&format!("{}/api/{API_VERSION}/graphql.json", server.uri())).unwrap();
    let storefront = StorefrontClient::with_endpoint(
        endpoint,
        StorefrontAuth::Public("public-token".to_string()),
        timeout,
    )
    .unwrap();
    let proxy = GraphqlProxy::with_origin(Url::parse(&server.uri()).unwrap(), timeout).unwrap();

    AppState::from_parts(
        config,
        storefront,
        proxy,
        Arc::new(InMemoryMessageStore::new()),
        None,
    )
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `name=value` pair of the session cookie, ready for a `Cookie` header.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_string)
    }
}

fn money(amount: &str) -> Value {
    json!({"amount": amount, "currencyCode": "CAD"})
}

/// Storefront cart payload with a single line of `quantity` items.
pub fn cart_json(id: &str, quantity: i64) -> Value {
    let lines = if quantity > 0 {
        json!([{
            "id": "L1",
            "quantity": quantity,
            "attributes": [],
            "cost": {"amountPerQuantity": money("25.0"), "totalAmount": money("25.0")},
            "merchandise": {
                "id": "gid://shopify/ProductVariant/1",
                "title": "Small",
                "price": money("25.0"),
                "image": null,
                "product": {"handle": "tee", "title": "Tee"}
            }
        }])
    } else {
        json!([])
    };

    json!({
        "id": id,
        "checkoutUrl": "https://shop.test/cart/c/1",
        "totalQuantity": quantity,
        "note": null,
        "cost": {"subtotalAmount": money("25.0"), "totalAmount": money("25.0")},
        "lines": {"nodes": lines}
    })
}

/// Storefront product card payload.
pub fn product_card_json(handle: &str) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{handle}"),
        "handle": handle,
        "title": handle.to_uppercase(),
        "featuredImage": null,
        "priceRange": {
            "minVariantPrice": money("25.0"),
            "maxVariantPrice": money("25.0")
        }
    })
}
