//! Page data loaders.
//!
//! Each page is served as JSON, both unprefixed (`/products/tee`) and under a
//! locale prefix (`/fr-ca/products/tee`). A prefix that names a different
//! locale than the resolved one is a terminal 404; the locale is resolved
//! from the same segment, so the router never produces one.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::context::RequestContext;
use crate::error::{AppError, Result};
use crate::redirect::check_locale_segment;
use crate::shopify::{
    Collection, CollectionSummary, Policy, PolicyKind, Product, ProductSummary,
};
use crate::state::AppState;

/// Number of products shown on the home page.
const RECOMMENDED_PRODUCTS_COUNT: u32 = 4;

/// Products per collection page.
const COLLECTION_PAGE_SIZE: u32 = 24;

/// Path parameters of pages without a handle.
#[derive(Debug, Deserialize)]
pub struct LocaleParams {
    #[serde(default)]
    pub locale: Option<String>,
}

/// Path parameters of pages addressed by handle.
#[derive(Debug, Deserialize)]
pub struct HandleParams {
    #[serde(default)]
    pub locale: Option<String>,
    pub handle: String,
}

/// Collection pagination.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    /// `endCursor` of the previous page.
    pub cursor: Option<String>,
}

/// Home page data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub featured_collection: Option<CollectionSummary>,
    pub recommended_products: Vec<ProductSummary>,
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct CollectionPage {
    pub collection: Collection,
}

#[derive(Debug, Serialize)]
pub struct PoliciesPage {
    pub policies: Vec<Policy>,
}

#[derive(Debug, Serialize)]
pub struct PolicyPage {
    pub policy: Policy,
}

/// Home page: featured collection and recommended products.
///
/// Both queries run concurrently; either one failing degrades to an empty
/// value instead of failing the page.
#[instrument(skip_all, fields(locale = %context.locale))]
pub async fn home(
    State(state): State<AppState>,
    context: RequestContext,
    Path(params): Path<LocaleParams>,
) -> Result<Json<HomePage>> {
    check_locale_segment(params.locale.as_deref(), context.locale)?;

    let storefront = context.storefront(state.storefront());
    let (featured, recommended) = tokio::join!(
        storefront.featured_collection(),
        storefront.recommended_products(RECOMMENDED_PRODUCTS_COUNT),
    );

    let featured_collection = featured.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load featured collection");
        None
    });
    let recommended_products = recommended.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load recommended products");
        Vec::new()
    });

    Ok(Json(HomePage {
        featured_collection,
        recommended_products,
    }))
}

/// Product detail page.
#[instrument(skip_all, fields(locale = %context.locale, handle = %params.handle))]
pub async fn product(
    State(state): State<AppState>,
    context: RequestContext,
    Path(params): Path<HandleParams>,
) -> Result<Json<ProductPage>> {
    check_locale_segment(params.locale.as_deref(), context.locale)?;

    let product = context
        .storefront(state.storefront())
        .product(&params.handle)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", params.handle)))?;

    Ok(Json(ProductPage { product }))
}

/// Collection page, one page of products at a time.
#[instrument(skip_all, fields(locale = %context.locale, handle = %params.handle))]
pub async fn collection(
    State(state): State<AppState>,
    context: RequestContext,
    Path(params): Path<HandleParams>,
    Query(query): Query<CollectionQuery>,
) -> Result<Json<CollectionPage>> {
    check_locale_segment(params.locale.as_deref(), context.locale)?;

    let collection = context
        .storefront(state.storefront())
        .collection(&params.handle, COLLECTION_PAGE_SIZE, query.cursor.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("collection {}", params.handle)))?;

    Ok(Json(CollectionPage { collection }))
}

/// All published shop policies.
#[instrument(skip_all, fields(locale = %context.locale))]
pub async fn policies(
    State(state): State<AppState>,
    context: RequestContext,
    Path(params): Path<LocaleParams>,
) -> Result<Json<PoliciesPage>> {
    check_locale_segment(params.locale.as_deref(), context.locale)?;

    let policies = context
        .storefront(state.storefront())
        .policies()
        .await?
        .into_list();

    Ok(Json(PoliciesPage { policies }))
}

/// A single policy by handle (`refund-policy`).
#[instrument(skip_all, fields(locale = %context.locale, handle = %params.handle))]
pub async fn policy(
    State(state): State<AppState>,
    context: RequestContext,
    Path(params): Path<HandleParams>,
) -> Result<Json<PolicyPage>> {
    check_locale_segment(params.locale.as_deref(), context.locale)?;

    let not_found = || AppError::NotFound(format!("policy {}", params.handle));
    let kind = PolicyKind::from_handle(&params.handle).ok_or_else(not_found)?;

    let policy = context
        .storefront(state.storefront())
        .policies()
        .await?
        .take(kind)
        .ok_or_else(not_found)?;

    Ok(Json(PolicyPage { policy }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::test_support::{TestApp, product_card_json};

    #[tokio::test]
    async fn test_home_degrades_featured_collection_on_transport_error() {
        let server = MockServer::start().await;
        // Slower than the client timeout: reqwest gives up with a transport error
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"operationName": "FeaturedCollection"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"collections": {"nodes": []}}}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"operationName": "RecommendedProducts"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"products": {"nodes": [product_card_json("tee")]}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let app = TestApp::with_timeout(&server, Duration::from_millis(300));
        let response = app.get("/").await;

        assert_eq!(response.status, StatusCode::OK);
        let body = response.json();
        assert!(body["featuredCollection"].is_null());
        assert_eq!(body["recommendedProducts"][0]["handle"], "tee");
    }

    #[tokio::test]
    async fn test_localized_product_passes_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "operationName": "Product",
                "variables": {"handle": "tee", "country": "CA", "language": "FR"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"product": null}})))
            .expect(1)
            .mount(&server)
            .await;
        // Redirect lookup for the resulting 404
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"operationName": "UrlRedirects"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"urlRedirects": {"nodes": []}}
            })))
            .mount(&server)
            .await;

        let app = TestApp::new(&server);
        let response = app.get("/fr-ca/products/tee").await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.json(), json!({"error": "Not found: product tee"}));
    }

    #[tokio::test]
    async fn test_unknown_policy_handle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"operationName": "Policies"})))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"operationName": "UrlRedirects"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"urlRedirects": {"nodes": []}}
            })))
            .mount(&server)
            .await;

        let app = TestApp::new(&server);
        let response = app.get("/policies/cookie-policy").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
