//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! shopfront-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection
//!   string for the storefront
//!
//! Applies `crates/storefront/migrations/` and creates the session table.

use secrecy::SecretString;
use shopfront_server::db::{self, MigrationError as SchemaError};

/// Errors from the migrate command.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Read the storefront database URL from the environment.
fn database_url() -> Result<SecretString, MigrationError> {
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
        .ok_or(MigrationError::MissingEnvVar("STOREFRONT_DATABASE_URL"))
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the database cannot be
/// reached, or a migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    db::run_migrations(&pool).await?;
    Ok(())
}
