//! # liyana-core: Pure Business Logic for the Liyana Nour Storefront
//!
//! This crate contains the cart pricing engine and everything it reads from,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Liyana Nour Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Storefront (console / TypeScript frontends)            │   │
//! │  │   Typed commands ──► Cart Bus ◄── Voice transcripts             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ liyana-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │ catalog │ │  cart   │ │ pricing │ │ coupon  │ │  voice  │  │   │
//! │  │   │ Product │ │LineItem │ │ Totals  │ │Registry │ │ Intents │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  liyana-store (Cart Store)                      │   │
//! │  │         items + applied coupons, totals recomputed on load      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Shared value types (`Rate`, `Variants`)
//! - [`catalog`] - Products, volumes and the catalog provider
//! - [`cart`] - Cart value object and its mutation API
//! - [`coupon`] - Coupon registry and code normalization
//! - [`pricing`] - The cart pricing engine
//! - [`voice`] - Keyword voice-command interpreter
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use liyana_core::cart::Cart;
//! use liyana_core::catalog::{CatalogProvider, StaticCatalog};
//! use liyana_core::pricing::PricingEngine;
//! use liyana_core::types::Variants;
//!
//! let catalog = StaticCatalog::liyana_nour();
//! let engine = PricingEngine::standard();
//! let product = catalog.product("ln-rouge").unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_item(product, 1, Variants::new()).unwrap();
//!
//! let totals = engine.price_cart(&cart).unwrap();
//! assert_eq!(totals.subtotal, product.effective_price());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod voice;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CouponOutcome, LineItem, RestoreReport};
pub use catalog::{CatalogProvider, Product, ProductVolume, StaticCatalog};
pub use coupon::{CouponRegistry, CouponRule};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{AppliedDiscount, DiscountKind, PricingEngine, PricingRules, Totals};
pub use types::{Rate, Variants};
pub use voice::{VoiceContext, VoiceIntent, VoiceInterpreter, VoiceResponse};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., saying "hundert" instead of "zehn").
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Variant key that selects a product volume (e.g. 50ml vs 100ml).
pub const VOLUME_VARIANT: &str = "volume";
