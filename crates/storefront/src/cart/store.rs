//! The session cart store.
//!
//! A [`CartStore`] owns one session's cart. It is constructed explicitly
//! with a storage slot and a notifier, loads the saved cart once, and then:
//!
//! - applies every mutation in memory,
//! - publishes the new cart to all subscribers before returning,
//! - writes the cart back to the slot (failures are logged, not returned),
//! - emits a toast for add, remove and clear.
//!
//! Mutations take `&mut self`; a store has exactly one owner and two
//! mutations can never interleave.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::instrument;
use voltedge_core::{Cart, CartItem, Product, ProductId, QuantityChange};

use crate::error;

use super::notify::{Notifier, Toast};
use super::persistence::CartPersistence;
use super::slot::StorageSlot;

/// Session-owned cart with persistence, subscriptions and notifications.
pub struct CartStore<S> {
    persistence: CartPersistence<S>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<Cart>,
}

impl<S: StorageSlot> CartStore<S> {
    /// Open the store, loading the saved cart from `slot`.
    ///
    /// A missing or corrupt saved cart yields an empty cart.
    pub fn open(slot: S, notifier: Arc<dyn Notifier>) -> Self {
        let persistence = CartPersistence::new(slot);
        let cart = persistence.load();
        tracing::debug!(
            slot = persistence.slot().key(),
            items = cart.items().len(),
            "Cart store opened"
        );

        Self {
            persistence,
            notifier,
            state: watch::Sender::new(cart),
        }
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Run `f` against the current cart without cloning it.
    pub fn with_cart<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver always holds the latest cart; its value is replaced
    /// before each mutating call returns.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Current cart total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.state.borrow().total()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.borrow().item_count()
    }

    /// The persistence adapter backing this store.
    pub const fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    /// Add one unit of `product`.
    pub fn add_one(&mut self, product: &Product) -> u32 {
        self.add_item(product, 1)
    }

    /// Add `quantity` units of `product`, returning the item's new quantity.
    ///
    /// Adding zero units does nothing, and so does an add that would leave
    /// the quantity unchanged because it is already at `u32::MAX`. An add
    /// whose total would be out of range, or whose price is negative, is
    /// refused and logged. None of these persist or toast.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> u32 {
        let before = self.with_cart(|cart| cart.get(&product.id).map_or(0, |item| item.quantity));
        if quantity == 0 {
            tracing::debug!("Ignoring add of zero units");
            return before;
        }

        let mut outcome = Ok(before);
        self.state.send_if_modified(|cart| {
            outcome = cart.add(product, quantity);
            matches!(outcome, Ok(resulting) if resulting != before)
        });

        match outcome {
            Err(e) => {
                tracing::warn!(error = %e, quantity, "Add to cart refused");
                before
            }
            Ok(resulting) if resulting == before => {
                tracing::debug!(quantity = before, "Item already at maximum quantity");
                before
            }
            Ok(resulting) => {
                self.persist();
                error::add_breadcrumb(
                    "Added to cart",
                    &[
                        ("product_id", product.id.as_str()),
                        ("quantity", quantity.to_string().as_str()),
                    ],
                );
                self.notifier.notify(&Toast::added(product, quantity));
                resulting
            }
        }
    }

    /// Set the absolute quantity of an item.
    ///
    /// Zero behaves exactly like [`remove_item`](Self::remove_item).
    /// Returns `false` if nothing changed: the product is not in the cart,
    /// or the new total would be out of range (logged).
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        let mut outcome = Ok(QuantityChange::Missing);
        self.state.send_if_modified(|cart| {
            outcome = cart.set_quantity(product_id, quantity);
            matches!(outcome, Ok(QuantityChange::Updated | QuantityChange::Removed(_)))
        });

        match outcome {
            Err(e) => {
                tracing::warn!(error = %e, "Quantity update refused");
                false
            }
            Ok(QuantityChange::Missing) => {
                tracing::debug!("Quantity update for product not in cart");
                false
            }
            Ok(QuantityChange::Updated) => {
                self.persist();
                true
            }
            Ok(QuantityChange::Removed(item)) => {
                self.persist();
                self.removed(&item);
                true
            }
        }
    }

    /// Remove an item, returning it if it was in the cart.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<CartItem> {
        let mut removed = None;
        self.state.send_if_modified(|cart| {
            removed = cart.remove(product_id);
            removed.is_some()
        });

        let Some(item) = removed else {
            tracing::debug!("Remove for product not in cart");
            return None;
        };
        self.persist();
        self.removed(&item);
        Some(item)
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.state.send_modify(Cart::clear);
        self.persist();

        error::add_breadcrumb("Cleared cart", &[]);
        self.notifier.notify(&Toast::cleared());
    }

    /// Replace the in-memory cart with whatever the slot currently holds.
    ///
    /// Picks up writes made by another store on the same slot.
    #[instrument(skip(self))]
    pub fn reload(&mut self) {
        let cart = self.persistence.load();
        self.state.send_replace(cart);
    }

    fn persist(&self) {
        let cart = self.state.borrow();
        self.persistence.save(&cart);
    }

    fn removed(&self, item: &CartItem) {
        error::add_breadcrumb("Removed from cart", &[("product_id", item.product_id.as_str())]);
        self.notifier.notify(&Toast::removed(item));
    }
}
