//! # API Error Type
//!
//! Error types for the storefront: `AppError` for startup and plumbing
//! failures, `ApiError` for what a cart command replies with.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Console / voice                 Cart actor                             │
//! │  ───────────────                 ──────────                             │
//! │                                                                         │
//! │  handle.execute(AddItem)                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  CartActor::apply → Result<CartResponse, ApiError>              │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown product? ── CoreError::ProductNotFound ──┐             │  │
//! │  │         │                                         │             │  │
//! │  │         ▼                                         ▼             │  │
//! │  │  Stock exceeded? ─── CoreError::InsufficientStock ─ ApiError ──►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_STOCK", "message": "…" }                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store failures never reach the customer: the actor logs them and keeps
//! serving the in-memory cart.

use liyana_core::CoreError;
use liyana_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// App Error
// =============================================================================

/// Result type alias for storefront plumbing.
pub type AppResult<T> = Result<T, AppError>;

/// Startup and runtime failures outside of cart semantics.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file is not valid TOML.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be written.
    #[error("Failed to save config: {0}")]
    ConfigSave(#[from] toml::ser::Error),

    /// Cart storage could not be opened.
    #[error("Cart store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Console output could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A console line could not be parsed.
    #[error("{0}")]
    InvalidCommand(String),

    /// The cart actor stopped.
    #[error("Cart service unavailable")]
    ChannelClosed,
}

// =============================================================================
// API Error
// =============================================================================

/// Error returned by a cart command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: ln-unknown"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, volume or line item does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart rule violated (size limit, inactive product)
    CartError,

    /// Requested quantity exceeds stock
    InsufficientStock,

    /// Cart service failure
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::ItemNotFound(id) => ApiError::not_found("Cart item", &id),
            e @ CoreError::VariantNotFound { .. } => ApiError::new(ErrorCode::NotFound, e.to_string()),
            e @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ (CoreError::ProductUnavailable(_) | CoreError::CartTooLarge { .. }) => {
                ApiError::new(ErrorCode::CartError, e.to_string())
            }
            e @ CoreError::QuantityTooLarge { .. } => ApiError::validation(e.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::InvalidLineItem { item_id, reason } => {
                // Cart invariants broken; the customer cannot fix this
                tracing::error!(%item_id, %reason, "Pricing rejected a line item");
                ApiError::internal("Cart could not be priced")
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidCommand(message) => ApiError::validation(message),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::ProductNotFound("ln-x".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: ln-x");

        let err: ApiError = CoreError::InsufficientStock {
            product_id: "ln-oud".to_string(),
            available: 8,
            requested: 9,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err: ApiError = CoreError::CartTooLarge { max: 100 }.into();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::validation("quantity must be positive");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "quantity must be positive");
    }
}
