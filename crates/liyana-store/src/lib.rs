//! # liyana-store: Cart Persistence for the Liyana Nour Storefront
//!
//! Saves and restores a session's cart. Only the inputs of the pricing engine
//! are stored (line items and applied coupon codes); totals are always
//! recomputed after loading.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Liyana Nour Data Flow                              │
//! │                                                                         │
//! │  Cart actor (storefront)                                               │
//! │       │ after every mutation            on startup                      │
//! │       ▼                                     ▼                           │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  liyana-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   CartStore   │    │ PersistedCart │    │   Backends   │   │   │
//! │  │   │   (trait)     │───►│ (snapshot.rs) │◄───│ memory.rs    │   │   │
//! │  │   │ load/save/rm  │    │ capture/      │    │ json_file.rs │   │   │
//! │  │   │               │    │ restore       │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/liyana-nour/carts/<session-id>.json                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use liyana_core::Cart;
//! use liyana_store::{CartStore, MemoryCartStore};
//!
//! let store = MemoryCartStore::new();
//! let session = "550e8400-e29b-41d4-a716-446655440000";
//!
//! store.save_cart(session, &Cart::new()).unwrap();
//! let restored = store.load_cart(session).unwrap();
//! assert!(restored.unwrap().is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod json_file;
pub mod memory;
pub mod snapshot;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use json_file::JsonFileCartStore;
pub use memory::MemoryCartStore;
pub use snapshot::PersistedCart;

use liyana_core::Cart;

// =============================================================================
// Cart Store Trait
// =============================================================================

/// Storage backend for session carts.
///
/// Backends only move [`PersistedCart`] snapshots around; the provided
/// `load_cart`/`save_cart` methods handle conversion and repair.
pub trait CartStore: Send + Sync {
    /// Reads the raw snapshot for a session, `None` if nothing was saved.
    fn load(&self, session_id: &str) -> StoreResult<Option<PersistedCart>>;

    /// Writes a snapshot, replacing any previous one for the same session.
    fn save(&self, snapshot: &PersistedCart) -> StoreResult<()>;

    /// Deletes a session's snapshot. Returns whether one existed.
    fn remove(&self, session_id: &str) -> StoreResult<bool>;

    /// Loads and repairs a session's cart.
    fn load_cart(&self, session_id: &str) -> StoreResult<Option<Cart>> {
        Ok(self.load(session_id)?.map(PersistedCart::restore))
    }

    /// Captures and saves a cart.
    fn save_cart(&self, session_id: &str, cart: &Cart) -> StoreResult<()> {
        self.save(&PersistedCart::capture(session_id, cart))
    }
}

impl<S: CartStore + ?Sized> CartStore for Box<S> {
    fn load(&self, session_id: &str) -> StoreResult<Option<PersistedCart>> {
        (**self).load(session_id)
    }

    fn save(&self, snapshot: &PersistedCart) -> StoreResult<()> {
        (**self).save(snapshot)
    }

    fn remove(&self, session_id: &str) -> StoreResult<bool> {
        (**self).remove(session_id)
    }
}
