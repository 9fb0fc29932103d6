//! Search API handlers.
//!
//! Queries shorter than [`MIN_QUERY_LEN`] characters return the empty
//! result shape without calling Shopify.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tracing::instrument;

use crate::context::RequestContext;
use crate::error::{AppError, Result};
use crate::shopify::{PredictiveSearchResults, SearchResults};
use crate::state::AppState;

/// Minimum trimmed query length that reaches Shopify.
pub const MIN_QUERY_LEN: usize = 2;

const DEFAULT_FIRST: u32 = 20;
const MAX_FIRST: u32 = 100;
const DEFAULT_LIMIT: u32 = 6;
const MAX_LIMIT: u32 = 10;

/// `GET /api/search` query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub first: Option<u32>,
}

/// `GET /api/search/predictive` query parameters.
#[derive(Debug, Deserialize)]
pub struct PredictiveQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<u32>,
}

/// The trimmed query, if it is long enough to search for.
fn searchable(q: &str) -> Option<&str> {
    let q = q.trim();
    (q.chars().count() >= MIN_QUERY_LEN).then_some(q)
}

fn query_params<T>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    query
        .map(|Query(params)| params)
        .map_err(|e| AppError::Validation(e.body_text()))
}

/// Full search over products and collections.
///
/// # Errors
///
/// - 400 for unparseable query parameters
/// - 500 when the Shopify query fails
#[instrument(skip_all, fields(locale = %context.locale))]
pub async fn search(
    State(state): State<AppState>,
    context: RequestContext,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResults>> {
    let params = query_params(query)?;
    let Some(q) = searchable(&params.q) else {
        return Ok(Json(SearchResults::default()));
    };

    let first = params.first.unwrap_or(DEFAULT_FIRST).clamp(1, MAX_FIRST);
    let results = context
        .storefront(state.storefront())
        .search(q, first)
        .await?;

    Ok(Json(results))
}

/// Search-as-you-type suggestions.
///
/// # Errors
///
/// - 400 for unparseable query parameters
/// - 500 when the Shopify query fails
#[instrument(skip_all, fields(locale = %context.locale))]
pub async fn predictive(
    State(state): State<AppState>,
    context: RequestContext,
    query: std::result::Result<Query<PredictiveQuery>, QueryRejection>,
) -> Result<Json<PredictiveSearchResults>> {
    let params = query_params(query)?;
    let Some(q) = searchable(&params.q) else {
        return Ok(Json(PredictiveSearchResults::default()));
    };

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let results = context
        .storefront(state.storefront())
        .predictive_search(q, limit)
        .await?;

    Ok(Json(results))
}
