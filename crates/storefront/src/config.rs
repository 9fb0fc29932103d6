//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE_DOMAIN` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_PUBLIC_TOKEN` - Storefront API public access token
//!
//! ## Optional
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Storefront API private access token
//!   (preferred over the public token when set)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `SHOPIFY_CHECKOUT_DOMAIN` - Domain the GraphQL proxy forwards to
//!   (default: derived from the store domain, see [`checkout_domain_for`])
//! - `SHOPIFY_REQUEST_TIMEOUT_SECS` - Upstream request timeout (default: 10)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!   (default: <http://localhost:3000>)
//! - `STOREFRONT_DATABASE_URL` / `DATABASE_URL` - `PostgreSQL` connection
//!   string; enables persistent sessions and chat messages
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2026-01";
const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "10";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Suffix of Shopify-hosted store domains.
const STORE_DOMAIN_SUFFIX: &str = ".myshopify.com";
/// Replacement suffix for the derived checkout domain.
const CHECKOUT_DOMAIN_SUFFIX: &str = ".checkout.myshopify.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store_domain: String,
    /// Domain the GraphQL proxy forwards to
    pub checkout_domain: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API public access token (safe to expose in browser)
    pub storefront_public_token: String,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: Option<SecretString>,
    /// Timeout applied to every upstream request
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store_domain", &self.store_domain)
            .field("checkout_domain", &self.checkout_domain)
            .field("api_version", &self.api_version)
            .field("storefront_public_token", &self.storefront_public_token)
            .field(
                "storefront_private_token",
                &self.storefront_private_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = parse_env(&env, "STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env(&env, "STOREFRONT_PORT", "3000")?;
        let base_url = env.get_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let database_url = env
            .get_optional("STOREFRONT_DATABASE_URL")
            .or_else(|| env.get_optional("DATABASE_URL"))
            .map(SecretString::from);

        let shopify = ShopifyStorefrontConfig::from_env(&env)?;

        Ok(Self {
            host,
            port,
            base_url,
            database_url,
            shopify,
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env(&env, "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env(&env, "SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ShopifyStorefrontConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let store_domain = normalize_domain(&env.get_required("SHOPIFY_STORE_DOMAIN")?);
        let checkout_domain = env
            .get_optional("SHOPIFY_CHECKOUT_DOMAIN")
            .map_or_else(|| checkout_domain_for(&store_domain), |d| normalize_domain(&d));
        let timeout_secs: u64 = parse_env(
            env,
            "SHOPIFY_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        Ok(Self {
            store_domain,
            checkout_domain,
            api_version: env.get_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            storefront_public_token: env.get_required("SHOPIFY_STOREFRONT_PUBLIC_TOKEN")?,
            storefront_private_token: get_validated_secret(
                env,
                "SHOPIFY_STOREFRONT_PRIVATE_TOKEN",
            )?,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// A source of configuration variables.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn get_required(&self, key: &str) -> Result<String, ConfigError> {
        self.get_optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }
}

/// Parse a variable (or its default) into `T`.
fn parse_env<F, T>(env: &Env<F>, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env.get_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Strip any scheme and trailing slashes from a domain.
fn normalize_domain(value: &str) -> String {
    let value = value.trim();
    let value = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value);
    value.trim_end_matches('/').to_string()
}

/// Default checkout domain for a store domain.
///
/// `{shop}.myshopify.com` becomes `{shop}.checkout.myshopify.com`; any other
/// domain (a custom domain already serving checkout) is used as-is.
fn checkout_domain_for(store_domain: &str) -> String {
    match store_domain.strip_suffix(STORE_DOMAIN_SUFFIX) {
        Some(shop) if !shop.is_empty() => format!("{shop}{CHECKOUT_DOMAIN_SUFFIX}"),
        _ => store_domain.to_string(),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate an optional secret.
fn get_validated_secret<F: Fn(&str) -> Option<String>>(
    env: &Env<F>,
    key: &str,
) -> Result<Option<SecretString>, ConfigError> {
    env.get_optional(key)
        .map(|value| {
            validate_secret_strength(&value, key)?;
            Ok(SecretString::from(value))
        })
        .transpose()
}
