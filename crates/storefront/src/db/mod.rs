//! Database connection and migrations for storefront `PostgreSQL`.
//!
//! The database is optional. Shopify is source of truth for products and
//! carts; only local state lives here:
//!
//! ## Tables
//!
//! - `tower_sessions.session` - Tower-sessions storage (created by the store)
//! - `chat_messages` - Chat messages per conversation
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p shopfront-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors while migrating the database.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the storefront schema and create the session table.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;

    tracing::info!("Creating session store schema...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Storefront migrations complete");
    Ok(())
}
