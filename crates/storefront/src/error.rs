//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Every error renders as JSON `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use shopfront_core::Locale;
use thiserror::Error;

use crate::messages::StoreError;
use crate::redirect::TerminalNotFound;
use crate::shopify::ShopifyError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed input validation.
    #[error("{0}")]
    Validation(String),

    /// Bad request from client (including upstream rejections of it).
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A locale prefix that conflicts with the resolved locale.
    #[error("Invalid locale prefix: {0}")]
    InvalidLocale(Locale),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Message store operation failed.
    #[error("Message store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::InvalidLocale(_) => StatusCode::NOT_FOUND,
            Self::Shopify(_) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Store(_) | Self::Internal(_) | Self::Shopify(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Shopify(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if matches!(self, Self::InvalidLocale(_)) {
            response.extensions_mut().insert(TerminalNotFound);
        }
        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::Validation("variantId is required".to_string());
        assert_eq!(err.to_string(), "variantId is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Shopify(ShopifyError::MissingData)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = AppError::BadRequest("No cart found".to_string()).into_response();
        assert_eq!(body_json(response).await, json!({"error": "No cart found"}));
    }

    #[tokio::test]
    async fn test_server_error_details_are_hidden() {
        let response = AppError::Shopify(ShopifyError::UserError("secret detail".to_string()))
            .into_response();
        assert_eq!(
            body_json(response).await,
            json!({"error": "External service error"})
        );
    }

    #[test]
    fn test_invalid_locale_is_terminal() {
        let response = AppError::InvalidLocale(Locale::DEFAULT).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<TerminalNotFound>().is_some());

        let response = AppError::NotFound("page".to_string()).into_response();
        assert!(response.extensions().get::<TerminalNotFound>().is_none());
    }
}
