//! Shopfront CLI - Database migrations and diagnostics.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! shopfront-cli migrate
//!
//! # Show how the storefront resolves the locale of a URL
//! shopfront-cli locale https://shop.example.com/fr-ca/products/tee
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `locale` - Resolve the buyer locale of a path or URL

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shopfront-cli")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Resolve the buyer locale of a path or URL
    Locale {
        /// Request path (`/fr-ca/products/tee`) or absolute URL
        target: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Locale { target } => commands::locale::resolve(&target),
    }
    Ok(())
}
