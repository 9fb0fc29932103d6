//! Storefront API pass-through for browser clients.

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// API versions look like `2026-01` or `unstable`.
fn is_valid_version(version: &str) -> bool {
    !version.is_empty()
        && version
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// `POST /api/{version}/graphql.json`
///
/// The GraphQL payload is not inspected. Upstream status, headers and body
/// are returned as received, including upstream errors.
///
/// # Errors
///
/// - 400 if `version` is not a plain version segment
/// - 500 if the checkout domain cannot be reached
#[instrument(skip(state, headers, body))]
pub async fn graphql(
    State(state): State<AppState>,
    Path(version): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    if !is_valid_version(&version) {
        return Err(AppError::Validation(format!("Invalid API version: {version}")));
    }

    let upstream = state.proxy().forward(&version, headers, body).await?;

    let mut response = Body::from(upstream.body).into_response();
    *response.status_mut() = upstream.status;
    *response.headers_mut() = upstream.headers;
    Ok(response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::test_support::TestApp;

    #[test]
    fn test_is_valid_version() {
        assert!(is_valid_version("2026-01"));
        assert!(is_valid_version("unstable"));
        assert!(!is_valid_version(""));
        assert!(!is_valid_version("2026-01%2F.."));
        assert!(!is_valid_version("v1.2"));
    }

    #[tokio::test]
    async fn test_returns_upstream_response_verbatim() {
        let server = MockServer::start().await;
        let query = r#"{"query":"{ shop { name } }"}"#;
        Mock::given(method("POST"))
            .and(path("/api/2026-01/graphql.json"))
            .and(header("x-shopify-storefront-access-token", "browser-token"))
            .and(body_string(query))
            .respond_with(
                ResponseTemplate::new(402)
                    .insert_header("x-shopify-stage", "production")
                    .set_body_string(r#"{"errors":"Payment Required"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let app = TestApp::new(&server);
        let request = axum::http::Request::post("/api/2026-01/graphql.json")
            .header("content-type", "application/json")
            .header("x-shopify-storefront-access-token", "browser-token")
            .body(Body::from(query))
            .unwrap();
        let response = app.send(request).await;

        assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(response.header("x-shopify-stage"), Some("production"));
        assert_eq!(&response.body[..], br#"{"errors":"Payment Required"}"#);
    }

    #[tokio::test]
    async fn test_transport_failure_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let app = TestApp::with_timeout(&server, Duration::from_millis(200));
        let response = app.post_json("/api/2026-01/graphql.json", &json!({})).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json(), json!({"error": "External service error"}));
    }

    #[tokio::test]
    async fn test_invalid_version() {
        let server = MockServer::start().await;
        let app = TestApp::new(&server);

        let response = app.post_json("/api/v1.2/graphql.json", &json!({})).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }
}
