//! # Cart Pricing Engine
//!
//! Pure, deterministic computation of cart totals from the line items, the
//! applied coupon codes and a fixed rule table.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ──► subtotal = Σ unit_price × quantity                           │
//! │               │                                                         │
//! │               ├── empty cart? ──► all zero, done                        │
//! │               ▼                                                         │
//! │  best discount (first match wins, never cumulative)                     │
//! │    1. volume tier    subtotal ≥ €105 → 10%, ≥ €75 → 5%                  │
//! │    2. free shipping  subtotal ≥ €50                                     │
//! │    3. coupons        in application order, minimum order respected      │
//! │               │                                                         │
//! │               ▼                                                         │
//! │  discount amount ──► discounted subtotal ──► tax 19% ──► total          │
//! │                          + shipping (€4.99 below €50, else free)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Scenario
//! ```rust
//! use liyana_core::money::Money;
//! use liyana_core::pricing::PricingEngine;
//! use liyana_core::cart::LineItem;
//! use liyana_core::types::Variants;
//!
//! let engine = PricingEngine::standard();
//! let items = vec![LineItem::new("ln-noir", "Liyana Nour Noir", Money::from_cents(8000), 1, Variants::new())];
//!
//! let totals = engine.compute_totals(&items, &[]).unwrap();
//! assert_eq!(totals.discount_amount.cents(), 400);  // 5% volume discount
//! assert_eq!(totals.shipping_cost, Money::zero());
//! assert_eq!(totals.tax_amount.cents(), 1444);
//! assert_eq!(totals.total.cents(), 9044);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, LineItem};
use crate::coupon::{normalize_code, CouponRegistry};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Rate;
use crate::validation::validate_price;

// =============================================================================
// Rule Constants
// =============================================================================

/// German VAT (19% MwSt), charged on the discounted subtotal.
pub const TAX_RATE: Rate = Rate::from_bps(1900);

/// Subtotal from which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(5000);

/// Shipping charged below the free-shipping threshold.
pub const STANDARD_SHIPPING_COST: Money = Money::from_cents(499);

/// First volume tier: 5% off from €75.
pub const VOLUME_DISCOUNT_TIER_1: Money = Money::from_cents(7500);

/// Second volume tier: 10% off from €105.
pub const VOLUME_DISCOUNT_TIER_2: Money = Money::from_cents(10500);

const FREE_SHIPPING_DESCRIPTION: &str = "Versandkostenfrei ab 50€";

// =============================================================================
// Discount Types
// =============================================================================

/// How a discount is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage of the subtotal.
    Percentage(Rate),
    /// Fixed amount off the subtotal, never more than the subtotal.
    Fixed(Money),
    /// Waives shipping; the subtotal is untouched.
    Shipping,
}

/// Which rule produced the discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountSource {
    FreeShipping,
    VolumeTier,
    Coupon { code: String },
}

/// The discount that won, for display next to the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    pub kind: DiscountKind,
    pub source: DiscountSource,
    /// Human-readable description, e.g. "5% Rabatt + Gratisproben".
    pub description: String,
    /// Volume tiers come with free perfume samples in the parcel.
    pub includes_samples: bool,
}

impl AppliedDiscount {
    /// The coupon code, when a coupon produced this discount.
    pub fn coupon_code(&self) -> Option<&str> {
        match &self.source {
            DiscountSource::Coupon { code } => Some(code),
            _ => None,
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Derived cart totals. Recomputed from items and coupons, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub total: Money,
    pub applied_discount: Option<AppliedDiscount>,
}

impl Totals {
    /// Subtotal after the discount, before shipping and tax.
    pub fn discounted_subtotal(&self) -> Money {
        self.subtotal.saturating_sub(self.discount_amount)
    }

    /// Human-readable description of the applied discount, if any.
    pub fn discount_description(&self) -> Option<&str> {
        self.applied_discount.as_ref().map(|d| d.description.as_str())
    }
}

// =============================================================================
// Rules
// =============================================================================

/// An automatic discount triggered purely by the subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeTier {
    pub threshold: Money,
    pub rate: Rate,
    pub description: String,
}

/// The fixed rule table the engine evaluates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingRules {
    pub tax_rate: Rate,
    pub free_shipping_threshold: Money,
    pub standard_shipping_cost: Money,
    pub volume_tiers: Vec<VolumeTier>,
}

impl PricingRules {
    /// The shop's rule table (19% tax, free shipping from €50, 5%/10% tiers).
    pub fn standard() -> Self {
        PricingRules {
            tax_rate: TAX_RATE,
            free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
            standard_shipping_cost: STANDARD_SHIPPING_COST,
            volume_tiers: vec![
                VolumeTier {
                    threshold: VOLUME_DISCOUNT_TIER_1,
                    rate: Rate::from_percent(5),
                    description: "5% Rabatt + Gratisproben".to_string(),
                },
                VolumeTier {
                    threshold: VOLUME_DISCOUNT_TIER_2,
                    rate: Rate::from_percent(10),
                    description: "10% Rabatt + Gratisproben".to_string(),
                },
            ],
        }
    }

    /// Highest volume tier reached by `subtotal`.
    fn volume_tier(&self, subtotal: Money) -> Option<&VolumeTier> {
        self.volume_tiers
            .iter()
            .filter(|tier| subtotal >= tier.threshold)
            .max_by_key(|tier| tier.threshold)
    }
}

impl Default for PricingRules {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// Computes cart totals. Holds only immutable rule data.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    rules: PricingRules,
    coupons: CouponRegistry,
}

impl PricingEngine {
    pub fn new(rules: PricingRules, coupons: CouponRegistry) -> Self {
        PricingEngine { rules, coupons }
    }

    /// Standard rules with the standard coupon registry.
    pub fn standard() -> Self {
        Self::new(PricingRules::standard(), CouponRegistry::standard())
    }

    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    pub fn coupons(&self) -> &CouponRegistry {
        &self.coupons
    }

    /// Prices a cart's current items and applied coupons.
    pub fn price_cart(&self, cart: &Cart) -> CoreResult<Totals> {
        self.compute_totals(cart.items(), cart.applied_coupons())
    }

    /// Computes totals for `items` with `applied_coupons` (oldest first).
    ///
    /// ## Errors
    /// [`CoreError::InvalidLineItem`] when an item has quantity ≤ 0 or a
    /// negative unit price. Unknown coupons are not errors.
    pub fn compute_totals(&self, items: &[LineItem], applied_coupons: &[String]) -> CoreResult<Totals> {
        if items.is_empty() {
            return Ok(Totals::default());
        }

        let subtotal = Self::subtotal(items)?;
        let discount = self.best_discount(subtotal, applied_coupons);

        let discount_amount = match discount.as_ref().map(|d| d.kind) {
            Some(DiscountKind::Percentage(rate)) => subtotal.apply_rate(rate),
            Some(DiscountKind::Fixed(amount)) => amount.max(Money::zero()),
            Some(DiscountKind::Shipping) | None => Money::zero(),
        }
        .min(subtotal);

        let waives_shipping = subtotal >= self.rules.free_shipping_threshold
            || matches!(discount.as_ref().map(|d| d.kind), Some(DiscountKind::Shipping));
        let shipping_cost = if waives_shipping || !subtotal.is_positive() {
            Money::zero()
        } else {
            self.rules.standard_shipping_cost
        };

        let discounted_subtotal = subtotal.saturating_sub(discount_amount);
        let tax_amount = discounted_subtotal.apply_rate(self.rules.tax_rate);
        let total = discounted_subtotal + shipping_cost + tax_amount;

        Ok(Totals {
            subtotal,
            shipping_cost,
            tax_amount,
            discount_amount,
            total,
            applied_discount: discount,
        })
    }

    /// Sum of `unit_price × quantity`, rejecting items the cart API would
    /// never produce.
    ///
    /// ## Errors
    /// [`CoreError::InvalidLineItem`] for a quantity ≤ 0, a price outside
    /// `0..=MAX_UNIT_PRICE`, or a sum that does not fit in `Money`.
    pub fn subtotal(items: &[LineItem]) -> CoreResult<Money> {
        items.iter().try_fold(Money::zero(), |sum, item| {
            let invalid = |reason: String| CoreError::InvalidLineItem {
                item_id: item.id.clone(),
                reason,
            };

            if item.quantity <= 0 {
                return Err(invalid(format!("quantity must be positive, got {}", item.quantity)));
            }
            validate_price(item.unit_price)
                .map_err(|e| invalid(format!("unit price {}: {}", item.unit_price, e)))?;

            item.unit_price
                .checked_multiply_quantity(item.quantity)
                .and_then(|line| sum.checked_add(line))
                .ok_or_else(|| invalid("subtotal overflows".to_string()))
        })
    }

    /// Picks the single discount that applies to `subtotal`.
    ///
    /// Rules are mutually exclusive; the first match wins:
    /// volume tier, then free shipping, then the first eligible coupon in
    /// application order.
    pub fn best_discount(&self, subtotal: Money, applied_coupons: &[String]) -> Option<AppliedDiscount> {
        if let Some(tier) = self.rules.volume_tier(subtotal) {
            return Some(AppliedDiscount {
                kind: DiscountKind::Percentage(tier.rate),
                source: DiscountSource::VolumeTier,
                description: tier.description.clone(),
                includes_samples: true,
            });
        }

        if subtotal >= self.rules.free_shipping_threshold {
            return Some(AppliedDiscount {
                kind: DiscountKind::Shipping,
                source: DiscountSource::FreeShipping,
                description: FREE_SHIPPING_DESCRIPTION.to_string(),
                includes_samples: false,
            });
        }

        applied_coupons.iter().find_map(|code| {
            self.coupons.lookup(code, subtotal).map(|rule| AppliedDiscount {
                kind: rule.kind,
                source: DiscountSource::Coupon {
                    code: normalize_code(code),
                },
                description: rule.description.clone(),
                includes_samples: false,
            })
        })
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coupon::CouponRule;
    use crate::types::Variants;

    fn item(id: &str, cents: i64, quantity: i64) -> LineItem {
        let mut item = LineItem::new(
            &format!("product-{}", id),
            &format!("Product {}", id),
            Money::from_cents(cents),
            quantity,
            Variants::new(),
        );
        item.id = id.to_string();
        item
    }

    fn coupons(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    // -------------------------------------------------------------------------
    // Scenarios
    // -------------------------------------------------------------------------

    #[test]
    fn test_below_free_shipping_threshold() {
        let engine = PricingEngine::standard();
        let totals = engine.compute_totals(&[item("a", 4999, 1)], &[]).unwrap();

        assert_eq!(totals.subtotal.cents(), 4999);
        assert_eq!(totals.shipping_cost.cents(), 499);
        assert_eq!(totals.tax_amount.cents(), 950);
        assert_eq!(totals.discount_amount, Money::zero());
        assert_eq!(totals.total.cents(), 6448);
        assert!(totals.applied_discount.is_none());
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        let engine = PricingEngine::standard();
        let totals = engine.compute_totals(&[item("a", 6000, 1)], &[]).unwrap();

        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.tax_amount.cents(), 1140);
        assert_eq!(totals.total.cents(), 7140);
        assert_eq!(totals.discount_description(), Some("Versandkostenfrei ab 50€"));
        assert_eq!(totals.applied_discount.unwrap().source, DiscountSource::FreeShipping);
    }

    #[test]
    fn test_first_volume_tier() {
        let engine = PricingEngine::standard();
        let totals = engine.compute_totals(&[item("a", 8000, 1)], &[]).unwrap();

        assert_eq!(totals.discount_amount.cents(), 400);
        assert_eq!(totals.discounted_subtotal().cents(), 7600);
        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.tax_amount.cents(), 1444);
        assert_eq!(totals.total.cents(), 9044);

        let discount = totals.applied_discount.unwrap();
        assert_eq!(discount.source, DiscountSource::VolumeTier);
        assert!(discount.includes_samples);
    }

    #[test]
    fn test_welcome_coupon() {
        let engine = PricingEngine::standard();
        let totals = engine
            .compute_totals(&[item("a", 3000, 1)], &coupons(&["WELCOME10"]))
            .unwrap();

        assert_eq!(totals.discount_amount.cents(), 300);
        assert_eq!(totals.discounted_subtotal().cents(), 2700);
        assert_eq!(totals.shipping_cost.cents(), 499);
        assert_eq!(totals.tax_amount.cents(), 513);
        assert_eq!(totals.total.cents(), 3712);
        assert_eq!(totals.applied_discount.unwrap().coupon_code(), Some("WELCOME10"));
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let engine = PricingEngine::standard();
        let totals = engine.compute_totals(&[], &coupons(&["FREESHIP"])).unwrap();
        assert_eq!(totals, Totals::default());
        assert_eq!(totals.total, Money::zero());
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    #[test]
    fn test_subtotal_is_order_independent() {
        let engine = PricingEngine::standard();
        let forward = vec![item("a", 1299, 2), item("b", 899, 3), item("c", 50, 7)];
        let mut backward = forward.clone();
        backward.reverse();

        let a = engine.compute_totals(&forward, &[]).unwrap();
        let b = engine.compute_totals(&backward, &[]).unwrap();
        assert_eq!(a.subtotal.cents(), 1299 * 2 + 899 * 3 + 50 * 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_shipping_boundary_at_exactly_fifty() {
        let engine = PricingEngine::standard();

        let at = engine.compute_totals(&[item("a", 5000, 1)], &[]).unwrap();
        assert_eq!(at.shipping_cost, Money::zero());

        let below = engine.compute_totals(&[item("a", 4999, 1)], &[]).unwrap();
        assert_eq!(below.shipping_cost, STANDARD_SHIPPING_COST);
    }

    #[test]
    fn test_volume_tier_beats_coupons() {
        let engine = PricingEngine::standard();
        let totals = engine
            .compute_totals(&[item("a", 11000, 1)], &coupons(&["SAVE20", "WELCOME10"]))
            .unwrap();

        assert_eq!(totals.discount_amount.cents(), 1100);
        let discount = totals.applied_discount.unwrap();
        assert_eq!(discount.source, DiscountSource::VolumeTier);
        assert_eq!(discount.description, "10% Rabatt + Gratisproben");
    }

    #[test]
    fn test_tier_thresholds_are_inclusive() {
        let engine = PricingEngine::standard();

        let tier_1 = engine.compute_totals(&[item("a", 7500, 1)], &[]).unwrap();
        assert_eq!(tier_1.discount_amount.cents(), 375);

        let tier_2 = engine.compute_totals(&[item("a", 10500, 1)], &[]).unwrap();
        assert_eq!(tier_2.discount_amount.cents(), 1050);
    }

    #[test]
    fn test_fixed_discount_is_clamped_to_subtotal() {
        let registry = CouponRegistry::new()
            .with_coupon("TWENTY", CouponRule::fixed(Money::from_cents(2000), "20€ Rabatt"));
        let engine = PricingEngine::new(PricingRules::standard(), registry);

        let totals = engine
            .compute_totals(&[item("a", 1000, 1)], &coupons(&["TWENTY"]))
            .unwrap();

        assert_eq!(totals.discount_amount.cents(), 1000);
        assert_eq!(totals.discounted_subtotal(), Money::zero());
        assert_eq!(totals.tax_amount, Money::zero());
        assert_eq!(totals.shipping_cost.cents(), 499);
        assert_eq!(totals.total.cents(), 499);
    }

    // -------------------------------------------------------------------------
    // Coupon resolution
    // -------------------------------------------------------------------------

    #[test]
    fn test_first_eligible_coupon_wins() {
        let engine = PricingEngine::standard();
        let totals = engine
            .compute_totals(&[item("a", 4000, 1)], &coupons(&["FREESHIP", "WELCOME10"]))
            .unwrap();

        assert_eq!(totals.discount_amount, Money::zero());
        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.applied_discount.unwrap().coupon_code(), Some("FREESHIP"));
    }

    #[test]
    fn test_coupon_below_minimum_falls_through() {
        let engine = PricingEngine::standard();
        // WELCOME10 needs €30; FREESHIP has no minimum
        let totals = engine
            .compute_totals(&[item("a", 2000, 1)], &coupons(&["WELCOME10", "FREESHIP"]))
            .unwrap();

        assert_eq!(totals.applied_discount.unwrap().coupon_code(), Some("FREESHIP"));
        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.total.cents(), 2000 + 380);
    }

    #[test]
    fn test_unknown_coupon_is_not_an_error() {
        let engine = PricingEngine::standard();
        let totals = engine
            .compute_totals(&[item("a", 2000, 1)], &coupons(&["BOGUS"]))
            .unwrap();
        assert!(totals.applied_discount.is_none());
        assert_eq!(totals.shipping_cost.cents(), 499);
    }

    #[test]
    fn test_coupons_ignored_above_free_shipping_threshold() {
        let engine = PricingEngine::standard();
        let totals = engine
            .compute_totals(&[item("a", 6000, 1)], &coupons(&["WELCOME10"]))
            .unwrap();
        assert_eq!(totals.discount_amount, Money::zero());
        assert_eq!(totals.applied_discount.unwrap().source, DiscountSource::FreeShipping);
    }

    // -------------------------------------------------------------------------
    // Contract violations
    // -------------------------------------------------------------------------

    #[test]
    fn test_non_positive_quantity_is_rejected() {
        let engine = PricingEngine::standard();
        let result = engine.compute_totals(&[item("a", 1000, 0)], &[]);
        assert!(matches!(result, Err(CoreError::InvalidLineItem { ref item_id, .. }) if item_id == "a"));

        let result = engine.compute_totals(&[item("b", 1000, -2)], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let engine = PricingEngine::standard();
        assert!(engine.compute_totals(&[item("a", -1, 1)], &[]).is_err());
    }

    #[test]
    fn test_price_above_cap_is_rejected_not_overflowed() {
        let engine = PricingEngine::standard();
        let result = engine.compute_totals(&[item("huge", i64::MAX / 100, 999)], &[]);
        assert!(matches!(result, Err(CoreError::InvalidLineItem { ref item_id, .. }) if item_id == "huge"));
    }

    #[test]
    fn test_free_items_do_not_pay_shipping() {
        let engine = PricingEngine::standard();
        let totals = engine.compute_totals(&[item("sample", 0, 2)], &[]).unwrap();
        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_totals_wire_shape() {
        let engine = PricingEngine::standard();
        let totals = engine
            .compute_totals(&[item("a", 3000, 1)], &coupons(&["welcome10"]))
            .unwrap();

        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["subtotal"], 3000);
        assert_eq!(json["shippingCost"], 499);
        assert_eq!(json["discountAmount"], 300);
        assert_eq!(json["total"], 3712);
        assert_eq!(json["appliedDiscount"]["kind"]["type"], "percentage");
        assert_eq!(json["appliedDiscount"]["source"]["type"], "coupon");
        assert_eq!(json["appliedDiscount"]["source"]["code"], "WELCOME10");
    }
}
