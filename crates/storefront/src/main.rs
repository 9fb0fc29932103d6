//! Shopfront storefront edge service.
//!
//! This binary serves the storefront API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON responses only
//! - Shopify Storefront API for products, collections, search and carts
//! - Optional `PostgreSQL` for sessions and chat messages; without a
//!   database both live in memory
//!
//! # Security
//!
//! This binary only has access to:
//! - Shopify Storefront API (public token, or private token when configured)
//! - The checkout domain, for proxied browser requests
//! - Local `PostgreSQL` database, when configured
//!
//! It does NOT have access to the Shopify Admin API.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use shopfront_server::config::StorefrontConfig;
use shopfront_server::messages::{MessageStore, PgMessageStore};
use shopfront_server::state::AppState;
use shopfront_server::{app, db};
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let addr = config.socket_addr();

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p shopfront-cli -- migrate
    let pool = match config.database_url.as_ref() {
        Some(database_url) => {
            let pool = db::create_pool(database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");
            Some(pool)
        }
        None => {
            tracing::warn!("No database configured; sessions and messages are kept in memory");
            None
        }
    };

    let router = if let Some(pool) = pool {
        let messages: Arc<dyn MessageStore> = Arc::new(PgMessageStore::new(pool.clone()));
        let session_store = PostgresStore::new(pool.clone());
        let state = AppState::new(config, Some(messages), Some(pool))
            .expect("Failed to initialize application state");
        app(state, session_store)
    } else {
        let state =
            AppState::new(config, None, None).expect("Failed to initialize application state");
        app(state, MemoryStore::default())
    };

    // Sentry layers (outermost for full request coverage)
    let router = router
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
