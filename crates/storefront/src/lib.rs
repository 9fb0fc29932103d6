//! Shopfront storefront edge service.
//!
//! Resolves the buyer locale from the URL, talks to the Shopify Storefront
//! API on the visitor's behalf, and serves page data, cart, search and chat
//! message endpoints as JSON. Browser-side Storefront API calls are passed
//! through to the checkout domain unchanged.
//!
//! [`app`] assembles the full router; the `shopfront-server` binary adds
//! Sentry and serves it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod redirect;
pub mod routes;
pub mod shopify;
pub mod state;

#[cfg(test)]
mod test_support;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use state::AppState;

/// Build the storefront router.
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let router = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes());

    with_layers(router, state, session_store)
}

/// Wrap `router` in the storefront middleware.
///
/// Layers, outermost first: tracing, request ID, session, redirect policy.
/// The session layer wraps the redirect policy so session changes are
/// committed on every outcome, redirects included.
pub(crate) fn with_layers<S>(router: Router<AppState>, state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(session_store, state.config());

    router
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            redirect::storefront_redirect,
        ))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity when a database is configured.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };

    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
