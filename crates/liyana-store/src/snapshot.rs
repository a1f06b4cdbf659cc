//! Persisted cart layout.
//!
//! ```json
//! {
//!   "sessionId": "550e8400-e29b-41d4-a716-446655440000",
//!   "items": [{ "id": "…", "productId": "ln-rouge", "unitPrice": 4999, "quantity": 1, … }],
//!   "appliedCoupons": ["WELCOME10"],
//!   "savedAt": "2026-10-16T12:00:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use liyana_core::{Cart, LineItem};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What gets written to storage for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    pub session_id: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub applied_coupons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub saved_at: DateTime<Utc>,
}

impl PersistedCart {
    /// Snapshots a cart's pricing inputs.
    pub fn capture(session_id: &str, cart: &Cart) -> Self {
        PersistedCart {
            session_id: session_id.to_string(),
            items: cart.items().to_vec(),
            applied_coupons: cart.applied_coupons().to_vec(),
            created_at: Some(cart.created_at()),
            saved_at: Utc::now(),
        }
    }

    /// Rebuilds the cart, dropping whatever breaks the cart invariants.
    pub fn restore(self) -> Cart {
        let created_at = self.created_at.unwrap_or(self.saved_at);
        let (cart, report) = Cart::restore(self.items, self.applied_coupons, created_at);

        if !report.is_clean() {
            warn!(
                session_id = %self.session_id,
                dropped_items = ?report.dropped_items,
                duplicate_items = ?report.duplicate_items,
                merged_items = ?report.merged_items,
                truncated_items = report.truncated_items.len(),
                capped_items = ?report.capped_items,
                dropped_coupons = ?report.dropped_coupons,
                "Repaired persisted cart"
            );
        }

        cart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liyana_core::{Money, PricingEngine, Variants};

    #[test]
    fn test_layout_uses_camel_case_and_no_totals() {
        let mut cart_items = vec![LineItem::new(
            "ln-rouge",
            "Liyana Nour Rouge",
            Money::from_cents(4999),
            1,
            Variants::new(),
        )];
        cart_items[0].id = "item-1".to_string();
        let (cart, _) = Cart::restore(cart_items, vec!["FREESHIP".to_string()], Utc::now());

        let snapshot = PersistedCart::capture("session-1", &cart);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["sessionId"], "session-1");
        assert_eq!(json["items"][0]["productId"], "ln-rouge");
        assert_eq!(json["items"][0]["unitPrice"], 4999);
        assert_eq!(json["appliedCoupons"][0], "FREESHIP");
        assert!(json.get("savedAt").is_some());
        assert!(json.get("totals").is_none());
    }

    #[test]
    fn test_restore_drops_invalid_items_and_recomputes() {
        let json = r#"{
            "sessionId": "s",
            "items": [
                {"id": "a", "productId": "ln-fresh", "name": "Liyana Nour Fresh",
                 "unitPrice": 3000, "quantity": 1, "addedAt": "2026-10-16T10:00:00Z"},
                {"id": "b", "productId": "ln-noir", "name": "Liyana Nour Noir",
                 "unitPrice": 8000, "quantity": -2, "addedAt": "2026-10-16T10:00:00Z"},
                {"id": "c", "productId": "ln-gold", "name": "Liyana Nour Gold",
                 "unitPrice": -100, "quantity": 1, "addedAt": "2026-10-16T10:00:00Z"}
            ],
            "appliedCoupons": ["welcome10", "WELCOME10"],
            "savedAt": "2026-10-16T10:05:00Z"
        }"#;

        let snapshot: PersistedCart = serde_json::from_str(json).unwrap();
        let cart = snapshot.restore();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].id, "a");
        assert!(cart.items()[0].selected_variants.is_empty());
        assert_eq!(cart.applied_coupons(), ["WELCOME10".to_string()]);

        let totals = PricingEngine::standard().price_cart(&cart).unwrap();
        assert_eq!(totals.total.cents(), 3712);
    }

    #[test]
    fn test_restore_merges_repeated_selection_and_drops_huge_price() {
        let json = r#"{
            "sessionId": "s",
            "items": [
                {"id": "a", "productId": "ln-rouge", "name": "Liyana Nour Rouge",
                 "unitPrice": 4999, "quantity": 1, "addedAt": "2026-10-16T10:00:00Z"},
                {"id": "b", "productId": "ln-rouge", "name": "Liyana Nour Rouge",
                 "unitPrice": 4999, "quantity": 2, "addedAt": "2026-10-16T10:01:00Z"},
                {"id": "c", "productId": "ln-noir", "name": "Liyana Nour Noir",
                 "unitPrice": 92233720368547758, "quantity": 999, "addedAt": "2026-10-16T10:02:00Z"}
            ],
            "appliedCoupons": [],
            "savedAt": "2026-10-16T10:05:00Z"
        }"#;

        let snapshot: PersistedCart = serde_json::from_str(json).unwrap();
        let cart = snapshot.restore();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].id, "a");
        assert_eq!(cart.items()[0].quantity, 3);

        let totals = PricingEngine::standard().price_cart(&cart).unwrap();
        assert_eq!(totals.subtotal.cents(), 14997);
    }
}
