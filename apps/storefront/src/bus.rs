//! # Cart Command Bus
//!
//! All cart mutations go through one actor task that owns the session cart.
//! Callers hold a cheap, cloneable [`CartHandle`] and get a reply with the
//! totals computed from exactly the state the mutation produced.
//!
//! ## Message Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Command Bus                                 │
//! │                                                                         │
//! │  console ──┐                                                            │
//! │            │  CartCommand { action, reply: oneshot }                    │
//! │  voice ────┼──────────────── mpsc (bounded) ─────────────┐              │
//! │            │                                             ▼              │
//! │  tests ────┘                              ┌──────────────────────────┐  │
//! │                                           │        CartActor         │  │
//! │                                           │  1. apply mutation       │  │
//! │                                           │  2. price_cart()         │  │
//! │                                           │  3. save items/coupons   │  │
//! │                                           │  4. reply CartResponse   │  │
//! │                                           └────────────┬─────────────┘  │
//! │  caller ◄──────────────── oneshot ─────────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One actor per session means no locks around the cart, and a slow coupon
//! check simply delays the commands queued behind it.

use std::sync::Arc;
use std::time::Duration;

use liyana_core::validation::validate_product_id;
use liyana_core::{
    Cart, CatalogProvider, CoreError, CouponOutcome, LineItem, PricingEngine, StaticCatalog,
    Totals, Variants,
};
use liyana_store::CartStore;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::{ApiError, AppError, AppResult};

// =============================================================================
// Commands
// =============================================================================

/// A cart operation, as sent over the bus.
///
/// ## Wire Shape
/// ```json
/// { "action": "add_item", "parameters": { "productId": "ln-rouge", "quantity": 1 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "parameters", rename_all = "snake_case")]
pub enum CartAction {
    /// Adds a product. `variants: None` selects the product's default volume.
    #[serde(rename_all = "camelCase")]
    AddItem {
        product_id: String,
        quantity: i64,
        #[serde(default)]
        variants: Option<Variants>,
    },

    /// Sets an item's quantity; ≤ 0 removes it.
    #[serde(rename_all = "camelCase")]
    UpdateQuantity { item_id: String, quantity: i64 },

    #[serde(rename_all = "camelCase")]
    RemoveItem { item_id: String },

    /// Removes all items and coupons.
    Clear,

    ApplyCoupon { code: String },

    RemoveCoupon { code: String },

    /// Read-only; returns the current cart.
    Get,
}

impl CartAction {
    /// Whether the action can change the cart (and must be persisted).
    pub fn is_mutation(&self) -> bool {
        !matches!(self, CartAction::Get)
    }

    fn name(&self) -> &'static str {
        match self {
            CartAction::AddItem { .. } => "add_item",
            CartAction::UpdateQuantity { .. } => "update_quantity",
            CartAction::RemoveItem { .. } => "remove_item",
            CartAction::Clear => "clear",
            CartAction::ApplyCoupon { .. } => "apply_coupon",
            CartAction::RemoveCoupon { .. } => "remove_coupon",
            CartAction::Get => "get",
        }
    }
}

/// Cart state after a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub applied_coupons: Vec<String>,
    pub totals: Totals,
    /// Sum of quantities.
    pub item_count: i64,
    /// Outcome of an `apply_coupon` command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon: Option<CouponOutcome>,
    /// Whether `remove_coupon` actually removed something.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_removed: Option<bool>,
}

impl CartResponse {
    fn new(cart: &Cart, totals: Totals) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            applied_coupons: cart.applied_coupons().to_vec(),
            totals,
            item_count: cart.item_count(),
            coupon: None,
            coupon_removed: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub type CartReply = Result<CartResponse, ApiError>;

/// Message to the actor.
#[derive(Debug)]
enum CartMessage {
    Command {
        action: CartAction,
        reply: oneshot::Sender<CartReply>,
    },
    Shutdown {
        done: oneshot::Sender<()>,
    },
}

// =============================================================================
// Handle
// =============================================================================

/// Cloneable sender side of the bus.
#[derive(Debug, Clone)]
pub struct CartHandle {
    cmd_tx: mpsc::Sender<CartMessage>,
}

impl CartHandle {
    /// Sends an action and waits for the resulting cart.
    pub async fn execute(&self, action: CartAction) -> CartReply {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(CartMessage::Command { action, reply })
            .await
            .map_err(|_| ApiError::from(AppError::ChannelClosed))?;

        rx.await.map_err(|_| ApiError::from(AppError::ChannelClosed))?
    }

    pub async fn add_item(&self, product_id: &str, quantity: i64, variants: Option<Variants>) -> CartReply {
        self.execute(CartAction::AddItem {
            product_id: product_id.to_string(),
            quantity,
            variants,
        })
        .await
    }

    pub async fn update_quantity(&self, item_id: &str, quantity: i64) -> CartReply {
        self.execute(CartAction::UpdateQuantity {
            item_id: item_id.to_string(),
            quantity,
        })
        .await
    }

    pub async fn remove_item(&self, item_id: &str) -> CartReply {
        self.execute(CartAction::RemoveItem {
            item_id: item_id.to_string(),
        })
        .await
    }

    pub async fn clear(&self) -> CartReply {
        self.execute(CartAction::Clear).await
    }

    pub async fn apply_coupon(&self, code: &str) -> CartReply {
        self.execute(CartAction::ApplyCoupon { code: code.to_string() })
            .await
    }

    pub async fn remove_coupon(&self, code: &str) -> CartReply {
        self.execute(CartAction::RemoveCoupon { code: code.to_string() })
            .await
    }

    pub async fn get(&self) -> CartReply {
        self.execute(CartAction::Get).await
    }

    /// Stops the actor after the commands already queued.
    pub async fn shutdown(&self) -> AppResult<()> {
        let (done, rx) = oneshot::channel();
        self.cmd_tx
            .send(CartMessage::Shutdown { done })
            .await
            .map_err(|_| AppError::ChannelClosed)?;
        rx.await.map_err(|_| AppError::ChannelClosed)
    }
}

// =============================================================================
// Actor
// =============================================================================

/// Owns one session's cart.
pub struct CartActor<S: CartStore> {
    session_id: String,
    cart: Cart,
    catalog: Arc<StaticCatalog>,
    engine: PricingEngine,
    store: S,
    coupon_latency: Duration,
}

impl<S: CartStore + 'static> CartActor<S> {
    /// Creates an actor, resuming the session's saved cart if there is one.
    ///
    /// A saved cart that cannot be read is logged and replaced by an empty one.
    pub fn load(session_id: impl Into<String>, catalog: Arc<StaticCatalog>, engine: PricingEngine, store: S) -> Self {
        let session_id = session_id.into();

        let cart = match store.load_cart(&session_id) {
            Ok(Some(cart)) => {
                info!(%session_id, items = cart.line_count(), "Resumed saved cart");
                cart
            }
            Ok(None) => {
                debug!(%session_id, "Starting with an empty cart");
                Cart::new()
            }
            Err(e) => {
                warn!(%session_id, error = %e, "Saved cart unreadable, starting with an empty cart");
                Cart::new()
            }
        };

        CartActor {
            session_id,
            cart,
            catalog,
            engine,
            store,
            coupon_latency: Duration::ZERO,
        }
    }

    /// Delay before each coupon is checked.
    pub fn with_coupon_latency(mut self, latency: Duration) -> Self {
        self.coupon_latency = latency;
        self
    }

    /// Starts the actor and returns a handle.
    pub fn start(self, capacity: usize) -> CartHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(capacity.max(1));

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        CartHandle { cmd_tx }
    }

    /// Main actor loop.
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<CartMessage>) {
        info!(session_id = %self.session_id, "Cart actor started");

        while let Some(message) = cmd_rx.recv().await {
            match message {
                CartMessage::Command { action, reply } => {
                    let result = self.handle(action).await;
                    // Caller may have given up waiting
                    let _ = reply.send(result);
                }
                CartMessage::Shutdown { done } => {
                    info!(session_id = %self.session_id, "Cart actor shutting down");
                    let _ = done.send(());
                    break;
                }
            }
        }
    }

    async fn handle(&mut self, action: CartAction) -> CartReply {
        let name = action.name();
        let persist = action.is_mutation();
        debug!(session_id = %self.session_id, action = name, "Cart command");

        let mut coupon = None;
        let mut coupon_removed = None;

        match action {
            CartAction::AddItem {
                product_id,
                quantity,
                variants,
            } => {
                validate_product_id(&product_id).map_err(CoreError::from)?;
                let product = self
                    .catalog
                    .product(&product_id)
                    .ok_or_else(|| CoreError::ProductNotFound(product_id.clone()))?;
                let variants = variants.unwrap_or_else(|| product.default_variants());
                self.cart.add_item(product, quantity, variants)?;
            }
            CartAction::UpdateQuantity { item_id, quantity } => {
                self.cart.update_quantity(&item_id, quantity)?;
            }
            CartAction::RemoveItem { item_id } => {
                self.cart.remove_item(&item_id)?;
            }
            CartAction::Clear => self.cart.clear(),
            CartAction::ApplyCoupon { code } => {
                if !self.coupon_latency.is_zero() {
                    tokio::time::sleep(self.coupon_latency).await;
                }
                let outcome = self.cart.apply_coupon(&code, self.engine.coupons())?;
                debug!(?outcome, "Coupon checked");
                coupon = Some(outcome);
            }
            CartAction::RemoveCoupon { code } => {
                coupon_removed = Some(self.cart.remove_coupon(&code));
            }
            CartAction::Get => {}
        }

        let totals = self.engine.price_cart(&self.cart)?;

        if persist {
            self.persist();
        }

        let mut response = CartResponse::new(&self.cart, totals);
        response.coupon = coupon;
        response.coupon_removed = coupon_removed;
        Ok(response)
    }

    /// Saves items and coupons. Failures are logged, never returned.
    /// Saves the cart, retrying a transient failure once. A failed save
    /// never fails the command.
    fn persist(&self) {
        let mut result = self.store.save_cart(&self.session_id, &self.cart);
        if let Err(ref e) = result {
            if e.is_transient() {
                debug!(session_id = %self.session_id, error = %e, "Retrying cart save");
                result = self.store.save_cart(&self.session_id, &self.cart);
            }
        }
        if let Err(e) = result {
            warn!(session_id = %self.session_id, error = %e, "Failed to save cart");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
