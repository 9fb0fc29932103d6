//! Not-found handling and storefront redirects.
//!
//! Every response passes through [`storefront_redirect`]. A 404 is turned
//! into a `301` when the shop knows where the page went:
//!
//! 1. `/admin` goes to the Shopify admin
//! 2. the path is looked up in the shop's URL redirect table
//! 3. a local `return_to` / `redirect` query parameter is followed
//!
//! Otherwise the original 404 is returned. Responses marked with
//! [`TerminalNotFound`] are never redirected.

use axum::extract::{Request, State};
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderValue, StatusCode, Uri, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use shopfront_core::{Locale, PrefixCheck};
use tracing::instrument;

use crate::error::AppError;
use crate::shopify::StorefrontClient;
use crate::state::AppState;

/// Query parameters that may carry a post-login style local redirect.
const REDIRECT_PARAMS: [&str; 2] = ["return_to", "redirect"];

/// Response extension marking a 404 that must not be redirected.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotFound;

/// Check a route's locale segment against the resolved locale.
///
/// # Errors
///
/// - [`AppError::NotFound`] if the segment is not locale-shaped
/// - [`AppError::InvalidLocale`] if it names a different locale (terminal)
pub fn check_locale_segment(segment: Option<&str>, resolved: Locale) -> Result<(), AppError> {
    let Some(segment) = segment else {
        return Ok(());
    };

    match resolved.check_prefix(segment) {
        PrefixCheck::Matches => Ok(()),
        PrefixCheck::NotALocale => Err(AppError::NotFound(segment.to_string())),
        // Unreachable through the router: the resolver and `{locale}` read the same segment
        PrefixCheck::Mismatch(_) => Err(AppError::InvalidLocale(resolved)),
    }
}

/// Outcome of the redirect policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Send a `301` to this location.
    Redirect(String),
    /// Keep the original 404.
    NotFound,
}

/// Decide where, if anywhere, a not-found request should go.
///
/// Lookup failures are logged and yield [`RedirectDecision::NotFound`].
#[instrument(skip(client))]
pub async fn evaluate(client: &StorefrontClient, store_domain: &str, uri: &Uri) -> RedirectDecision {
    let path = uri.path();

    if path == "/admin" {
        return RedirectDecision::Redirect(format!("https://{store_domain}/admin"));
    }

    let path_and_query = uri.path_and_query().map_or(path, PathAndQuery::as_str);
    let mut candidates = vec![path_and_query.to_lowercase()];
    if uri.query().is_some() {
        candidates.push(path.to_lowercase());
    }

    for candidate in &candidates {
        match client.url_redirect(candidate).await {
            Ok(Some(target)) => return RedirectDecision::Redirect(target),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, path = %candidate, "URL redirect lookup failed");
                return RedirectDecision::NotFound;
            }
        }
    }

    uri.query()
        .and_then(local_redirect_param)
        .map_or(RedirectDecision::NotFound, RedirectDecision::Redirect)
}

/// A `return_to` / `redirect` value that stays on this site.
fn local_redirect_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| REDIRECT_PARAMS.contains(&key.as_ref()))
        .map(|(_, value)| value.into_owned())
        .find(|value| is_local_path(value))
}

fn is_local_path(value: &str) -> bool {
    value.starts_with('/') && !value.starts_with("//") && !value.starts_with("/\\")
}

/// Build a `301 Moved Permanently` response.
fn moved_permanently(location: &str) -> Option<Response> {
    let location = HeaderValue::try_from(location).ok()?;
    Some((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}

/// Middleware applying the redirect policy to not-found responses of any
/// method.
pub async fn storefront_redirect(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri().clone();

    let response = next.run(request).await;

    if response.status() != StatusCode::NOT_FOUND
        || response.extensions().get::<TerminalNotFound>().is_some()
    {
        return response;
    }

    let decision = evaluate(
        state.storefront(),
        &state.config().shopify.store_domain,
        &uri,
    )
    .await;

    match decision {
        RedirectDecision::Redirect(location) => {
            tracing::info!(from = %uri, to = %location, "Redirecting not-found request");
            moved_permanently(&location).unwrap_or(response)
        }
        RedirectDecision::NotFound => response,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::shopify::StorefrontAuth;

    fn client(uri: &str) -> StorefrontClient {
        StorefrontClient::with_endpoint(
            Url::parse(&format!("{uri}/api/2026-01/graphql.json")).unwrap(),
            StorefrontAuth::Public("t".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn redirects(nodes: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_json(json!({"data": {"urlRedirects": {"nodes": nodes}}}))
    }

    #[test]
    fn test_check_locale_segment() {
        let fr_ca = Locale::parse_segment("fr-ca").unwrap();

        assert!(check_locale_segment(None, Locale::DEFAULT).is_ok());
        assert!(check_locale_segment(Some("FR-ca"), fr_ca).is_ok());
        assert!(matches!(
            check_locale_segment(Some("blog"), Locale::DEFAULT),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            check_locale_segment(Some("de-at"), fr_ca),
            Err(AppError::InvalidLocale(locale)) if locale == fr_ca
        ));
    }

    #[test]
    fn test_local_redirect_param() {
        assert_eq!(
            local_redirect_param("return_to=%2Faccount").as_deref(),
            Some("/account")
        );
        assert_eq!(local_redirect_param("redirect=/cart&x=1").as_deref(), Some("/cart"));
        assert_eq!(local_redirect_param("return_to=//evil.example.com"), None);
        assert_eq!(local_redirect_param("return_to=https://evil.example.com"), None);
        assert_eq!(local_redirect_param("q=shoes"), None);
    }

    #[tokio::test]
    async fn test_admin_redirects_without_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(redirects(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let decision = evaluate(
            &client(&server.uri()),
            "demo.myshopify.com",
            &"/admin".parse().unwrap(),
        )
        .await;
        assert_eq!(
            decision,
            RedirectDecision::Redirect("https://demo.myshopify.com/admin".to_string())
        );
    }

    #[tokio::test]
    async fn test_lookup_uses_lowercased_path_then_bare_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"variables": {"query": "path:/old-page"}})))
            .respond_with(redirects(json!([{"path": "/old-page", "target": "/new-page"}])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"variables": {"query": "path:/old-page?ref=mail"}})))
            .respond_with(redirects(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let decision = evaluate(
            &client(&server.uri()),
            "demo.myshopify.com",
            &"/Old-Page?ref=MAIL".parse().unwrap(),
        )
        .await;
        assert_eq!(decision, RedirectDecision::Redirect("/new-page".to_string()));
    }

    #[tokio::test]
    async fn test_falls_back_to_return_to() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(redirects(json!([])))
            .mount(&server)
            .await;

        let decision = evaluate(
            &client(&server.uri()),
            "demo.myshopify.com",
            &"/login?return_to=/account".parse().unwrap(),
        )
        .await;
        assert_eq!(decision, RedirectDecision::Redirect("/account".to_string()));
    }

    #[tokio::test]
    async fn test_lookup_failure_keeps_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let decision = evaluate(
            &client(&server.uri()),
            "demo.myshopify.com",
            &"/gone?return_to=/account".parse().unwrap(),
        )
        .await;
        assert_eq!(decision, RedirectDecision::NotFound);
    }
}
