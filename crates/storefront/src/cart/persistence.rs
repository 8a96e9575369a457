//! Cart persistence over a storage slot.
//!
//! Loading never fails: a missing, unreadable or corrupt slot yields an
//! empty cart. Saving never fails either: write errors are logged and
//! reported, and the in-memory cart stays authoritative.

use voltedge_core::{Cart, CartRecord};

use crate::error::{self, StorageError};

use super::slot::StorageSlot;

/// Reads and writes a [`Cart`] as JSON in a [`StorageSlot`].
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    slot: S,
}

impl<S: StorageSlot> CartPersistence<S> {
    /// Wrap a slot.
    pub const fn new(slot: S) -> Self {
        Self { slot }
    }

    /// The underlying slot.
    pub const fn slot(&self) -> &S {
        &self.slot
    }

    /// Load the saved cart, or an empty cart if none can be read.
    ///
    /// Duplicate and zero-quantity rows are repaired and the total is
    /// recomputed, so a hand-edited value still loads. A value whose total
    /// cannot be represented is treated as corrupt.
    pub fn load(&self) -> Cart {
        match self.try_load() {
            Ok(Some(cart)) => cart,
            Ok(None) => {
                tracing::debug!(slot = self.slot.key(), "No saved cart, starting empty");
                Cart::empty()
            }
            Err(e) => {
                tracing::warn!(
                    slot = self.slot.key(),
                    error = %e,
                    "Failed to load saved cart, starting empty"
                );
                Cart::empty()
            }
        }
    }

    /// Serialize `cart` and write it to the slot.
    pub fn save(&self, cart: &Cart) {
        if let Err(e) = self.try_save(cart) {
            error::report("save", self.slot.key(), &e);
        }
    }

    /// Delete the saved cart.
    pub fn discard(&self) {
        if let Err(e) = self.slot.remove() {
            error::report("discard", self.slot.key(), &e);
        }
    }

    /// Load without the empty-cart fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or does not hold a cart.
    pub fn try_load(&self) -> Result<Option<Cart>, StorageError> {
        let Some(raw) = self.slot.read()? else {
            return Ok(None);
        };

        let record: CartRecord = serde_json::from_str(&raw)?;
        let (cart, repaired) = Cart::from_record(record)?;
        if repaired {
            tracing::info!(
                slot = self.slot.key(),
                items = cart.items().len(),
                "Saved cart had duplicate or empty items, repaired"
            );
        }
        Ok(Some(cart))
    }

    /// Save without swallowing errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be encoded or written.
    pub fn try_save(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_string(cart)?;
        self.slot.write(&json)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use voltedge_core::{CartError, Product, ProductId};

    use super::super::slot::MemorySlot;
    use super::*;

    /// A slot whose every operation fails.
    struct BrokenSlot;

    impl StorageSlot for BrokenSlot {
        fn key(&self) -> &str {
            "broken"
        }

        fn read(&self) -> crate::error::Result<Option<String>> {
            Err(StorageError::Unavailable("read refused".to_string()))
        }

        fn write(&self, _value: &str) -> crate::error::Result<()> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove(&self) -> crate::error::Result<()> {
            Err(StorageError::Unavailable("remove refused".to_string()))
        }
    }

    fn sample_cart() -> Cart {
        let mut cart = Cart::empty();
        cart.add(
            &Product::new("p1", "Mechanical Keyboard", Decimal::new(14_900, 2))
                .with_category("peripherals")
                .with_image("https://cdn.example/kb.jpg"),
            2,
        )
        .unwrap();
        cart.add(&Product::new("p2", "Mouse Pad", Decimal::new(999, 2)), 1)
            .unwrap();
        cart
    }

    #[test]
    fn test_load_missing_is_empty() {
        let persistence = CartPersistence::new(MemorySlot::new("cart"));
        assert_eq!(persistence.load(), Cart::empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let persistence = CartPersistence::new(MemorySlot::new("cart"));
        let cart = sample_cart();

        persistence.save(&cart);
        assert_eq!(persistence.load(), cart);
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let persistence = CartPersistence::new(MemorySlot::with_value("cart", "{not json"));
        assert_eq!(persistence.load(), Cart::empty());
        assert!(persistence.try_load().is_err());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let persistence =
            CartPersistence::new(MemorySlot::with_value("cart", r#"{"items": 5, "total": 0}"#));
        assert_eq!(persistence.load(), Cart::empty());
    }

    #[test]
    fn test_load_recomputes_stale_total() {
        let raw = r#"{
            "items": [
                {"productId": "p1", "product": {"id": "p1", "name": "Cable", "price": 10}, "quantity": 3}
            ],
            "total": 0
        }"#;
        let persistence = CartPersistence::new(MemorySlot::with_value("cart", raw));

        let cart = persistence.load();
        assert_eq!(cart.total(), Decimal::new(30, 0));
        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, 3);
    }

    #[test]
    fn test_load_without_total_field() {
        let raw = r#"{"items": [{"productId": "p1", "product": {"id": "p1", "name": "Cable", "price": "2.50"}, "quantity": 2}]}"#;
        let persistence = CartPersistence::new(MemorySlot::with_value("cart", raw));
        assert_eq!(persistence.load().total(), Decimal::new(5, 0));
    }

    #[test]
    fn test_load_unrepresentable_total_is_empty() {
        let raw = r#"{"items":[{"productId":"p1","product":{"id":"p1","name":"X","price":"100000000000000000000"},"quantity":4000000000}],"total":"0"}"#;
        let persistence = CartPersistence::new(MemorySlot::with_value("cart", raw));

        assert_eq!(persistence.load(), Cart::empty());
        assert!(matches!(
            persistence.try_load(),
            Err(StorageError::InvalidCart(CartError::TotalOutOfRange))
        ));
    }

    #[test]
    fn test_load_negative_price_is_empty() {
        let raw = r#"{"items":[{"productId":"p1","product":{"id":"p1","name":"X","price":"-3"},"quantity":1}]}"#;
        let persistence = CartPersistence::new(MemorySlot::with_value("cart", raw));
        assert_eq!(persistence.load(), Cart::empty());
    }

    #[test]
    fn test_broken_slot_never_panics() {
        let persistence = CartPersistence::new(BrokenSlot);
        assert_eq!(persistence.load(), Cart::empty());
        persistence.save(&sample_cart());
        persistence.discard();
        assert!(persistence.try_save(&sample_cart()).is_err());
    }

    #[test]
    fn test_discard() {
        let slot = MemorySlot::new("cart");
        let persistence = CartPersistence::new(slot.clone());
        persistence.save(&sample_cart());
        persistence.discard();
        assert_eq!(slot.value(), None);
    }
}
