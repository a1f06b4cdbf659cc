//! # Error Types
//!
//! Domain-specific error types for liyana-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  liyana-core errors (this file)                                        │
//! │  ├── CoreError        - Cart and pricing rule violations               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  liyana-store errors (separate crate)                                  │
//! │  └── StoreError       - Cart persistence failures                      │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── ApiError         - What the console/frontend sees (serialized)    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → ApiError → Frontend    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A coupon that does not exist is NOT an error anywhere in this crate: the
//! pricing engine treats it as "no discount" and the cart reports it through
//! [`crate::cart::CouponOutcome`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product exists but is no longer sold.
    #[error("Product {0} is not available for sale")]
    ProductUnavailable(String),

    /// A variant (e.g. a volume id) does not exist for the product.
    #[error("Product {product_id} has no {key} '{value}'")]
    VariantNotFound {
        product_id: String,
        key: String,
        value: String,
    },

    /// Insufficient stock to fulfil the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: "ln-oud", available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Line item is not in the cart.
    #[error("Item {0} not in cart")]
    ItemNotFound(String),

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// The pricing engine received a line item that the mutation API
    /// should never have produced.
    #[error("Invalid line item {item_id}: {reason}")]
    InvalidLineItem { item_id: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
