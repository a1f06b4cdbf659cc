//! # Validation Module
//!
//! Input validation for everything that reaches the cart from the outside
//! (console input, voice transcripts, persisted snapshots).
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console / voice session                                      │
//! │  ├── Parsing (numbers, amounts, command shape)                         │
//! │  └── Immediate German feedback                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart mutation API                                            │
//! │  └── THIS MODULE: quantities, codes, variants, limits                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PricingEngine                                                │
//! │  └── Rejects items that break the cart invariants (contract check)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use liyana_core::validation::{validate_coupon_code, validate_quantity};
//!
//! validate_quantity(5).unwrap();
//! validate_coupon_code("WELCOME10").unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Variants;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted coupon code.
pub const MAX_COUPON_CODE_LEN: usize = 32;

/// Longest accepted variant key or value.
pub const MAX_VARIANT_LEN: usize = 64;

/// Highest accepted unit price (€1,000,000).
///
/// Keeps `MAX_CART_ITEMS × MAX_ITEM_QUANTITY × price` far inside `i64`.
pub const MAX_UNIT_PRICE: Money = Money::from_cents(100_000_000);

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product id (catalog slug).
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Lowercase letters, digits and hyphens only
///
/// ## Example
/// ```rust
/// use liyana_core::validation::validate_product_id;
///
/// assert!(validate_product_id("ln-rouge").is_ok());
/// assert!(validate_product_id("").is_err());
/// assert!(validate_product_id("LN ROUGE").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "product id".to_string(),
            max: 64,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "product id".to_string(),
            reason: "must contain only lowercase letters, digits and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a coupon code as typed by the customer.
///
/// Case and surrounding whitespace are ignored; the registry normalizes.
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "coupon code".to_string(),
        });
    }

    if code.len() > MAX_COUPON_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "coupon code".to_string(),
            max: MAX_COUPON_CODE_LEN,
        });
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: "coupon code".to_string(),
            reason: "must contain only letters, digits, hyphens and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a variant selection.
///
/// ## Rules
/// - Keys and values must not be empty
/// - Keys and values at most 64 characters
pub fn validate_variants(variants: &Variants) -> ValidationResult<()> {
    for (key, value) in variants {
        if key.trim().is_empty() || value.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "variant".to_string(),
            });
        }
        if key.len() > MAX_VARIANT_LEN || value.len() > MAX_VARIANT_LEN {
            return Err(ValidationError::TooLong {
                field: "variant".to_string(),
                max: MAX_VARIANT_LEN,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  Customer says "ich nehme zwei" / types "/add ln-rouge 2"              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(2) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → Proceed with add_item                                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must not be negative (zero is a free sample)
/// - Must not exceed `MAX_UNIT_PRICE`
///
/// ## Example
/// ```rust
/// use liyana_core::validation::validate_price;
/// use liyana_core::Money;
///
/// assert!(validate_price(Money::from_cents(4999)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());    // free sample
/// assert!(validate_price(Money::from_cents(-1)).is_err());
/// assert!(validate_price(Money::from_cents(i64::MAX / 100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE.cents(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size before adding another distinct item.
///
/// ## Rules
/// - Must stay below MAX_CART_ITEMS (100)
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Session Validators
// =============================================================================

/// Validates a cart session id (UUID).
///
/// ```rust
/// use liyana_core::validation::validate_session_id;
///
/// assert!(validate_session_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_session_id("not-a-uuid").is_err());
/// ```
pub fn validate_session_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "session id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "session id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("ln-rouge").is_ok());
        assert!(validate_product_id("ln-discovery-set").is_ok());

        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("   ").is_err());
        assert!(validate_product_id("ln_rouge").is_err());
        assert!(validate_product_id(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_coupon_code() {
        assert!(validate_coupon_code("WELCOME10").is_ok());
        assert!(validate_coupon_code(" save20 ").is_ok());

        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code("SAVE 20").is_err());
        assert!(validate_coupon_code(&"A".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_variants() {
        let mut variants = Variants::new();
        assert!(validate_variants(&variants).is_ok());

        variants.insert("volume".to_string(), "ln-rouge-50".to_string());
        assert!(validate_variants(&variants).is_ok());

        variants.insert("engraving".to_string(), " ".to_string());
        assert!(validate_variants(&variants).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(4999)).is_ok());
        assert!(validate_price(Money::from_cents(-100)).is_err());
        assert!(validate_price(MAX_UNIT_PRICE).is_ok());
        assert!(validate_price(MAX_UNIT_PRICE + Money::from_cents(1)).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_err());
    }

    #[test]
    fn test_validate_session_id() {
        assert!(validate_session_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("123").is_err());
    }
}
