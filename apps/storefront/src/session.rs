//! # Voice Session
//!
//! Connects the keyword interpreter to the cart bus. Keeps the one piece of
//! conversational state the interpreter needs: which product was last shown.
//!
//! ## Transcript Handling
//! ```text
//! transcript ──► VoiceInterpreter::interpret(selected, cart total)
//!                      │
//!                      ├── ShowProduct / SelectProduct ──► remember product
//!                      ├── AddToCart ─────────────────────► bus: add_item (qty 1)
//!                      ├── ClearCart ─────────────────────► bus: clear
//!                      └── everything else ───────────────► reply only
//! ```

use std::sync::Arc;

use liyana_core::{CatalogProvider, StaticCatalog, VoiceContext, VoiceIntent, VoiceInterpreter, VoiceResponse};
use serde::Serialize;
use tracing::{debug, warn};

use crate::bus::{CartHandle, CartResponse};

/// What a transcript led to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceOutcome {
    #[serde(flatten)]
    pub response: VoiceResponse,
    /// Cart after a cart-changing intent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartResponse>,
}

/// One customer's voice conversation.
pub struct VoiceSession {
    catalog: Arc<StaticCatalog>,
    cart: CartHandle,
    selected_product: Option<String>,
}

impl VoiceSession {
    pub fn new(catalog: Arc<StaticCatalog>, cart: CartHandle) -> Self {
        VoiceSession {
            catalog,
            cart,
            selected_product: None,
        }
    }

    /// Product the next "in den Warenkorb" refers to.
    pub fn selected_product(&self) -> Option<&str> {
        self.selected_product.as_deref()
    }

    pub fn select(&mut self, product_id: impl Into<String>) {
        self.selected_product = Some(product_id.into());
    }

    /// Interprets a transcript and carries out its cart side effects.
    pub async fn handle_transcript(&mut self, transcript: &str) -> VoiceOutcome {
        let cart_total = match self.cart.get().await {
            Ok(cart) if !cart.is_empty() => Some(cart.totals.total),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Cart unavailable for voice context");
                None
            }
        };

        let mut response = {
            let context = VoiceContext {
                selected_product: self.selected_product.as_deref(),
                cart_total,
            };
            VoiceInterpreter::new(self.catalog.as_ref()).interpret(transcript, &context)
        };
        debug!(intent = ?response.intent, "Voice intent");

        let mut cart = None;
        match response.intent.clone() {
            VoiceIntent::ShowProduct { product_id } | VoiceIntent::SelectProduct { product_id } => {
                self.selected_product = Some(product_id);
            }
            VoiceIntent::AddToCart { product_id, variants } => {
                match self.cart.add_item(&product_id, 1, Some(variants)).await {
                    Ok(updated) => cart = Some(updated),
                    Err(e) => {
                        let name = self
                            .catalog
                            .product(&product_id)
                            .map_or(product_id.as_str(), |p| p.name.as_str());
                        response.reply = format!(
                            "{} konnte nicht hinzugefügt werden: {}",
                            name, e.message
                        );
                    }
                }
            }
            VoiceIntent::ClearCart => match self.cart.clear().await {
                Ok(updated) => cart = Some(updated),
                Err(e) => {
                    response.reply = format!("Der Warenkorb konnte nicht geleert werden: {}", e.message);
                }
            },
            _ => {}
        }

        VoiceOutcome { response, cart }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::CartActor;
    use liyana_core::PricingEngine;
    use liyana_store::MemoryCartStore;

    fn session() -> VoiceSession {
        let catalog = Arc::new(StaticCatalog::liyana_nour());
        let cart = CartActor::load(
            "550e8400-e29b-41d4-a716-446655440000",
            catalog.clone(),
            PricingEngine::standard(),
            MemoryCartStore::new(),
        )
        .start(8);
        VoiceSession::new(catalog, cart)
    }

    #[tokio::test]
    async fn test_show_then_add() {
        let mut session = session();

        let outcome = session.handle_transcript("Zeige mir Rouge").await;
        assert_eq!(session.selected_product(), Some("ln-rouge"));
        assert!(outcome.cart.is_none());

        let outcome = session.handle_transcript("Das möchte ich kaufen").await;
        assert_eq!(outcome.response.reply, "Liyana Nour Rouge wurde zum Warenkorb hinzugefügt");
        let cart = outcome.cart.unwrap();
        assert_eq!(cart.item_count, 1);
        assert_eq!(cart.totals.total.cents(), 6448);
    }

    #[tokio::test]
    async fn test_price_uses_cart_total_without_selection() {
        let mut session = session();
        session.select("ln-rouge");
        session.handle_transcript("kaufen").await;

        let mut fresh = VoiceSession::new(session.catalog.clone(), session.cart.clone());
        let outcome = fresh.handle_transcript("wie teuer").await;
        assert_eq!(
            outcome.response.reply,
            "Ihr Warenkorb enthält Artikel im Wert von 64.48 Euro"
        );
    }

    #[tokio::test]
    async fn test_add_failure_is_spoken() {
        let mut session = session();
        session.select("ln-limited-edition");

        // 3 in stock at 50ml
        for _ in 0..3 {
            session.handle_transcript("ich nehme").await;
        }
        let outcome = session.handle_transcript("ich nehme").await;

        assert!(outcome.cart.is_none());
        assert!(outcome
            .response
            .reply
            .starts_with("Liyana Nour Limited Edition konnte nicht hinzugefügt werden"));
    }

    #[tokio::test]
    async fn test_clear_by_voice() {
        let mut session = session();
        session.select("ln-fresh");
        session.handle_transcript("hinzufügen").await;

        let outcome = session.handle_transcript("alles löschen").await;
        assert!(outcome.cart.unwrap().is_empty());
    }
}
