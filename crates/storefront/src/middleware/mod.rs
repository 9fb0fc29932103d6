//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions; commits on every outcome)
//! 5. Storefront redirect (404 handling, see [`crate::redirect`])

pub mod request_id;
pub mod session;

pub use request_id::request_id_middleware;
pub use session::{create_session_layer, keys as session_keys};
