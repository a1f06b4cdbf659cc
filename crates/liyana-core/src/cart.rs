//! # Cart
//!
//! The shopping cart value object and its mutation API.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Action                   Method                  Cart Change           │
//! │  ──────                   ──────                  ───────────           │
//! │  Add product ────────────► add_item() ──────────► push or merge        │
//! │  Change quantity ────────► update_quantity() ───► qty = n (≤0 removes) │
//! │  Remove ─────────────────► remove_item() ───────► items.remove(i)      │
//! │  Enter coupon ───────────► apply_coupon() ──────► coupons.push(CODE)   │
//! │  Drop coupon ────────────► remove_coupon() ─────► coupons.retain(..)   │
//! │  Clear ──────────────────► clear() ─────────────► items + coupons gone │
//! │                                                                         │
//! │  Totals are NOT stored here: the caller prices the cart with           │
//! │  PricingEngine right after each mutation.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every item has `1 <= quantity <= MAX_ITEM_QUANTITY`
//! - Items are unique by (`product_id`, `selected_variants`)
//! - At most `MAX_CART_ITEMS` distinct items
//! - Coupon codes are normalized, unique, and kept in application order

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::Product;
use crate::coupon::{normalize_code, CouponRegistry};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::PricingEngine;
use crate::types::Variants;
use crate::validation::{
    validate_cart_size, validate_coupon_code, validate_price, validate_quantity, validate_variants,
};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Line Item
// =============================================================================

/// One product/variant/quantity entry in a cart.
///
/// Name and unit price are frozen when the item is added; later catalog
/// price changes do not touch carts in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique within the cart (UUID v4).
    pub id: String,

    /// Back-reference into the catalog.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    pub quantity: i64,

    /// Part of the item's identity: same product + different variants never merge.
    #[serde(default)]
    pub selected_variants: Variants,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a line item with a fresh id.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
        selected_variants: Variants,
    ) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity,
            selected_variants,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Whether this item is the given product with exactly these variants.
    pub fn is_same_selection(&self, product_id: &str, variants: &Variants) -> bool {
        self.product_id == product_id && &self.selected_variants == variants
    }
}

// =============================================================================
// Coupon Outcome
// =============================================================================

/// Result of entering a coupon code.
///
/// Rejections are normal outcomes, not errors: the caller decides whether to
/// tell the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CouponOutcome {
    /// Code accepted and added to the cart.
    Applied { code: String },
    /// Code was already on the cart; nothing changed.
    AlreadyApplied { code: String },
    /// Code does not exist.
    Unknown { code: String },
    /// Code exists but the current subtotal is below its minimum.
    MinimumNotMet { code: String, min_order_value: Money },
}

impl CouponOutcome {
    /// Whether the code is on the cart after the call.
    pub fn is_active(&self) -> bool {
        matches!(self, CouponOutcome::Applied { .. } | CouponOutcome::AlreadyApplied { .. })
    }
}

// =============================================================================
// Restore Report
// =============================================================================

/// What was discarded while rebuilding a cart from untrusted data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Ids of items dropped for non-positive quantity or a price outside `0..=MAX_UNIT_PRICE`.
    pub dropped_items: Vec<String>,
    /// Ids of items dropped because an earlier item already used the id.
    pub duplicate_items: Vec<String>,
    /// Ids of items folded into an earlier item with the same selection.
    pub merged_items: Vec<String>,
    /// Ids of items beyond `MAX_CART_ITEMS`.
    pub truncated_items: Vec<String>,
    /// Quantities that were capped at `MAX_ITEM_QUANTITY`.
    pub capped_items: Vec<String>,
    /// Coupon codes dropped as empty or duplicate.
    pub dropped_coupons: Vec<String>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_items.is_empty()
            && self.duplicate_items.is_empty()
            && self.merged_items.is_empty()
            && self.truncated_items.is_empty()
            && self.capped_items.is_empty()
            && self.dropped_coupons.is_empty()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
    applied_coupons: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        let now = Utc::now();
        Cart {
            items: Vec::new(),
            applied_coupons: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a cart from persisted parts, enforcing the cart invariants.
    ///
    /// ## Repairs
    /// - items with quantity ≤ 0 or an invalid price are dropped
    /// - an item whose id was already used is dropped
    /// - items with the same selection merge into the first one
    /// - items past `MAX_CART_ITEMS` are dropped
    /// - quantities above the maximum are capped (after merging)
    /// - coupon codes are normalized; empty and duplicate codes are dropped
    pub fn restore(
        items: Vec<LineItem>,
        applied_coupons: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> (Self, RestoreReport) {
        let mut report = RestoreReport::default();
        let mut cart = Cart {
            items: Vec::with_capacity(items.len().min(MAX_CART_ITEMS)),
            applied_coupons: Vec::with_capacity(applied_coupons.len()),
            created_at,
            updated_at: Utc::now(),
        };
        let mut seen_ids = HashSet::with_capacity(items.len());

        for item in items {
            if item.quantity <= 0 || validate_price(item.unit_price).is_err() {
                report.dropped_items.push(item.id);
                continue;
            }
            if seen_ids.contains(&item.id) {
                report.duplicate_items.push(item.id);
                continue;
            }

            if let Some(existing) = cart
                .items
                .iter_mut()
                .find(|i| i.is_same_selection(&item.product_id, &item.selected_variants))
            {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                seen_ids.insert(item.id.clone());
                report.merged_items.push(item.id);
                continue;
            }

            if cart.items.len() >= MAX_CART_ITEMS {
                report.truncated_items.push(item.id);
                continue;
            }

            seen_ids.insert(item.id.clone());
            cart.items.push(item);
        }

        for item in cart.items.iter_mut().filter(|i| i.quantity > MAX_ITEM_QUANTITY) {
            item.quantity = MAX_ITEM_QUANTITY;
            report.capped_items.push(item.id.clone());
        }

        for code in applied_coupons {
            let normalized = normalize_code(&code);
            if normalized.is_empty() || cart.applied_coupons.contains(&normalized) {
                report.dropped_coupons.push(code);
                continue;
            }
            cart.applied_coupons.push(normalized);
        }

        (cart, report)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Applied coupon codes, oldest first.
    pub fn applied_coupons(&self) -> &[String] {
        &self.applied_coupons
    }

    pub fn item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Number of distinct line items.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all items (the badge on the cart icon).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // =========================================================================
    // Item Mutations
    // =========================================================================

    /// Adds a product, or increases the quantity of the matching item.
    ///
    /// ## Behavior
    /// - Same product + same variants already in cart: quantities add up
    /// - Otherwise: a new item with the resolved unit price
    ///
    /// ## Returns
    /// The id of the added or updated line item.
    pub fn add_item(&mut self, product: &Product, quantity: i64, variants: Variants) -> CoreResult<String> {
        validate_quantity(quantity)?;
        validate_variants(&variants)?;

        if !product.is_active {
            return Err(CoreError::ProductUnavailable(product.id.clone()));
        }

        let (unit_price, stock) = product.resolve(&variants)?;

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.is_same_selection(&product.id, &variants))
        {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            check_stock(&product.id, stock, new_qty)?;

            item.quantity = new_qty;
            let id = item.id.clone();
            self.touch();
            return Ok(id);
        }

        validate_cart_size(self.items.len()).map_err(|_| CoreError::CartTooLarge { max: MAX_CART_ITEMS })?;
        check_stock(&product.id, stock, quantity)?;

        let item = LineItem::new(product.id.clone(), product.name.clone(), unit_price, quantity, variants);
        let id = item.id.clone();
        self.items.push(item);
        self.touch();
        Ok(id)
    }

    /// Sets the quantity of an item.
    ///
    /// ## Behavior
    /// - quantity ≤ 0: removes the item
    /// - quantity > max: error
    /// - unknown item: error
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_item(item_id).map(|_| ());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;
        item.quantity = quantity;
        self.touch();
        Ok(())
    }

    /// Removes an item, returning it.
    pub fn remove_item(&mut self, item_id: &str) -> CoreResult<LineItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;
        let item = self.items.remove(index);
        self.touch();
        Ok(item)
    }

    /// Removes all items and all coupons.
    pub fn clear(&mut self) {
        self.items.clear();
        self.applied_coupons.clear();
        self.touch();
    }

    // =========================================================================
    // Coupon Mutations
    // =========================================================================

    /// Enters a coupon code.
    ///
    /// The code is checked against the registry and the CURRENT subtotal; a
    /// rejected code is not stored. Entering a code twice is a no-op.
    pub fn apply_coupon(&mut self, code: &str, registry: &CouponRegistry) -> CoreResult<CouponOutcome> {
        validate_coupon_code(code)?;
        let code = normalize_code(code);

        if self.applied_coupons.contains(&code) {
            return Ok(CouponOutcome::AlreadyApplied { code });
        }

        let Some(rule) = registry.rule(&code) else {
            return Ok(CouponOutcome::Unknown { code });
        };

        let subtotal = PricingEngine::subtotal(&self.items)?;
        if !rule.is_eligible(subtotal) {
            return Ok(CouponOutcome::MinimumNotMet {
                code,
                min_order_value: rule.min_order_value.unwrap_or_default(),
            });
        }

        self.applied_coupons.push(code.clone());
        self.touch();
        Ok(CouponOutcome::Applied { code })
    }

    /// Removes a coupon code. Returns whether it was applied.
    pub fn remove_coupon(&mut self, code: &str) -> bool {
        let code = normalize_code(code);
        let before = self.applied_coupons.len();
        self.applied_coupons.retain(|c| c != &code);

        let removed = self.applied_coupons.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn check_stock(product_id: &str, available: i64, requested: i64) -> CoreResult<()> {
    if requested > available {
        return Err(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            available,
            requested,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
