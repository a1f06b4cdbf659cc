//! # Coupon Registry
//!
//! Static lookup table from coupon code to discount rule.
//!
//! ## Matching Rules
//! ```text
//! input "welcome10 " ──normalize──► "WELCOME10" ──lookup──► rule
//!                                                             │
//!                               min_order_value met? ◄────────┘
//!                                  │            │
//!                                 yes           no
//!                                  │            │
//!                               Some(rule)    None  (same as unknown code)
//! ```
//!
//! An unmet minimum order value is reported exactly like an unknown code, so
//! a later coupon in the applied list still gets its chance.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::money::Money;
use crate::pricing::DiscountKind;
use crate::types::Rate;

/// Normalizes a user-entered coupon code (trimmed, uppercase).
///
/// ```rust
/// use liyana_core::coupon::normalize_code;
///
/// assert_eq!(normalize_code("  welcome10 "), "WELCOME10");
/// ```
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

// =============================================================================
// Coupon Rule
// =============================================================================

/// What a coupon grants and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRule {
    pub kind: DiscountKind,
    /// Minimum subtotal for the coupon to apply.
    pub min_order_value: Option<Money>,
    pub description: String,
}

impl CouponRule {
    /// Percentage off the subtotal.
    pub fn percentage(rate: Rate, description: impl Into<String>) -> Self {
        CouponRule {
            kind: DiscountKind::Percentage(rate),
            min_order_value: None,
            description: description.into(),
        }
    }

    /// Fixed amount off the subtotal (clamped to the subtotal when priced).
    pub fn fixed(amount: Money, description: impl Into<String>) -> Self {
        CouponRule {
            kind: DiscountKind::Fixed(amount),
            min_order_value: None,
            description: description.into(),
        }
    }

    /// Waives the shipping cost.
    pub fn free_shipping(description: impl Into<String>) -> Self {
        CouponRule {
            kind: DiscountKind::Shipping,
            min_order_value: None,
            description: description.into(),
        }
    }

    /// Requires a minimum subtotal.
    pub fn with_min_order(mut self, min: Money) -> Self {
        self.min_order_value = Some(min);
        self
    }

    /// Whether the rule's minimum order value is met by `subtotal`.
    pub fn is_eligible(&self, subtotal: Money) -> bool {
        self.min_order_value.map_or(true, |min| subtotal >= min)
    }
}

// =============================================================================
// Coupon Registry
// =============================================================================

/// Case-insensitive coupon table.
#[derive(Debug, Clone, Default)]
pub struct CouponRegistry {
    rules: HashMap<String, CouponRule>,
}

impl CouponRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shop's standard coupons.
    ///
    /// | Code        | Discount       | Min. order |
    /// |-------------|----------------|------------|
    /// | `WELCOME10` | 10%            | €30.00     |
    /// | `SAVE20`    | €20.00         | €100.00    |
    /// | `FREESHIP`  | free shipping  | -          |
    pub fn standard() -> Self {
        CouponRegistry::new()
            .with_coupon(
                "WELCOME10",
                CouponRule::percentage(Rate::from_percent(10), "Willkommensrabatt 10%")
                    .with_min_order(Money::from_major_minor(30, 0)),
            )
            .with_coupon(
                "SAVE20",
                CouponRule::fixed(Money::from_major_minor(20, 0), "20€ Rabatt")
                    .with_min_order(Money::from_major_minor(100, 0)),
            )
            .with_coupon("FREESHIP", CouponRule::free_shipping("Kostenloser Versand"))
    }

    /// Adds (or replaces) a coupon. The code is normalized.
    pub fn with_coupon(mut self, code: &str, rule: CouponRule) -> Self {
        self.insert(code, rule);
        self
    }

    /// Adds (or replaces) a coupon. The code is normalized.
    pub fn insert(&mut self, code: &str, rule: CouponRule) {
        self.rules.insert(normalize_code(code), rule);
    }

    /// Whether the code exists at all, ignoring minimum order values.
    pub fn contains(&self, code: &str) -> bool {
        self.rules.contains_key(&normalize_code(code))
    }

    /// Returns the rule for `code` if it exists AND `subtotal` meets its minimum.
    pub fn lookup(&self, code: &str, subtotal: Money) -> Option<&CouponRule> {
        self.rules
            .get(&normalize_code(code))
            .filter(|rule| rule.is_eligible(subtotal))
    }

    /// Returns the rule for `code` regardless of the minimum order value.
    pub fn rule(&self, code: &str) -> Option<&CouponRule> {
        self.rules.get(&normalize_code(code))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
