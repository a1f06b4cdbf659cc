//! In-memory cart store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::snapshot::PersistedCart;
use crate::CartStore;

/// Keeps snapshots in a map. Lost on exit.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    carts: RwLock<HashMap<String, PersistedCart>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.carts.read().map(|carts| carts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self, session_id: &str) -> StoreResult<Option<PersistedCart>> {
        let carts = self.carts.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(carts.get(session_id).cloned())
    }

    fn save(&self, snapshot: &PersistedCart) -> StoreResult<()> {
        let mut carts = self.carts.write().map_err(|_| StoreError::LockPoisoned)?;
        carts.insert(snapshot.session_id.clone(), snapshot.clone());
        Ok(())
    }

    fn remove(&self, session_id: &str) -> StoreResult<bool> {
        let mut carts = self.carts.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(carts.remove(session_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liyana_core::{Cart, CatalogProvider, PricingEngine, StaticCatalog, Variants};

    #[test]
    fn test_save_load_remove() {
        let store = MemoryCartStore::new();
        let catalog = StaticCatalog::liyana_nour();
        let engine = PricingEngine::standard();

        let mut cart = Cart::new();
        cart.add_item(catalog.product("ln-noir").unwrap(), 1, Variants::new())
            .unwrap();
        store.save_cart("s1", &cart).unwrap();

        assert_eq!(store.len(), 1);
        let restored = store.load_cart("s1").unwrap().unwrap();
        assert_eq!(restored.items(), cart.items());
        assert_eq!(
            engine.price_cart(&restored).unwrap(),
            engine.price_cart(&cart).unwrap()
        );

        assert!(store.remove("s1").unwrap());
        assert!(!store.remove("s1").unwrap());
        assert!(store.load_cart("s1").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_boxed_store_delegates() {
        let store: Box<dyn CartStore> = Box::new(MemoryCartStore::new());
        store.save_cart("s2", &Cart::new()).unwrap();
        assert!(store.load_cart("s2").unwrap().is_some());
    }
}
