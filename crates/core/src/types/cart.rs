//! Cart and line item types.
//!
//! A [`Cart`] is an ordered list of [`CartItem`]s with at most one item per
//! product, plus a cached `total`. All mutations go through the methods on
//! `Cart`, which recompute the total from the items every time.
//!
//! Every `Cart` value upholds its invariants, including one decoded from
//! JSON: deserialization goes through [`CartRecord`] and rejects carts whose
//! total cannot be represented or that hold a negative price. Mutations that
//! would break an invariant are refused and leave the cart unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::product::Product;

/// Reasons a cart mutation or decoded cart is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// A line total or the cart total exceeds the range of `Decimal`.
    #[error("cart total is out of range")]
    TotalOutOfRange,

    /// Product prices must not be negative.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// One line item: a product snapshot plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Identifier of the product this line refers to.
    pub product_id: ProductId,
    /// Snapshot of the product taken when it was first added.
    pub product: Product,
    /// Number of units. Always greater than zero in a cart.
    pub quantity: u32,
}

impl CartItem {
    /// Unit price multiplied by quantity, or `None` if it is out of range.
    ///
    /// Always `Some` for items held by a [`Cart`].
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.product.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Outcome of [`Cart::set_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    /// The item's quantity was set to the new value.
    Updated,
    /// A zero quantity removed the item.
    Removed(CartItem),
    /// No item with that product ID exists.
    Missing,
}

/// Cart as stored, before its invariants are checked.
///
/// Rows may repeat a product or carry a zero quantity; both are repaired by
/// [`Cart::from_record`]. A stored `total` is ignored and recomputed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartRecord {
    /// Stored rows in order.
    pub items: Vec<CartItem>,
}

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "CartRecord")]
pub struct Cart {
    items: Vec<CartItem>,
    total: Decimal,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    /// Build a cart from rows of untrusted origin.
    ///
    /// Merges items that share a product ID (first snapshot wins,
    /// quantities are summed), drops zero-quantity items and computes the
    /// total. The flag is `true` if any row was merged or dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is negative or the total is out of range.
    pub fn from_record(record: CartRecord) -> Result<(Self, bool), CartError> {
        let mut merged: Vec<CartItem> = Vec::with_capacity(record.items.len());
        let mut repaired = false;

        for item in record.items {
            if item.product.price < Decimal::ZERO {
                return Err(CartError::NegativePrice(item.product_id));
            }
            if item.quantity == 0 {
                repaired = true;
                continue;
            }
            if let Some(existing) = merged.iter_mut().find(|m| m.product_id == item.product_id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                repaired = true;
            } else {
                merged.push(item);
            }
        }

        let mut cart = Self {
            items: merged,
            total: Decimal::ZERO,
        };
        cart.total = cart.computed_total().ok_or(CartError::TotalOutOfRange)?;
        Ok((cart, repaired))
    }

    /// Build a cart from items, repairing duplicates as [`from_record`](Self::from_record) does.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is negative or the total is out of range.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Result<Self, CartError> {
        Self::from_record(CartRecord {
            items: items.into_iter().collect(),
        })
        .map(|(cart, _)| cart)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Cached sum of all line totals.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Sum of quantities across all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the item for a product.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Recompute the total from the items alone, or `None` if it overflows.
    #[must_use]
    pub fn computed_total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.line_total()?))
    }

    /// Add `quantity` units of `product`.
    ///
    /// Accumulates onto the existing item if the product is already in the
    /// cart, otherwise appends a new item holding a snapshot of `product`.
    /// Returns the item's resulting quantity, which saturates at `u32::MAX`.
    /// Adding zero units leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// Refuses a negative price or a total that would be out of range. The
    /// cart is left unchanged.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        let existing = self.get(&product.id).map(|item| item.quantity);
        if quantity == 0 {
            return Ok(existing.unwrap_or(0));
        }

        match existing {
            Some(current) => {
                let resulting = current.saturating_add(quantity);
                if resulting != current {
                    self.try_set(&product.id, current, resulting)?;
                }
                Ok(resulting)
            }
            None => {
                if product.price < Decimal::ZERO {
                    return Err(CartError::NegativePrice(product.id.clone()));
                }
                self.items.push(CartItem {
                    product_id: product.id.clone(),
                    product: product.clone(),
                    quantity,
                });
                match self.computed_total() {
                    Some(total) => {
                        self.total = total;
                        Ok(quantity)
                    }
                    None => {
                        self.items.pop();
                        Err(CartError::TotalOutOfRange)
                    }
                }
            }
        }
    }

    /// Set the absolute quantity for a product.
    ///
    /// A zero quantity removes the item. Unknown products are left alone.
    ///
    /// # Errors
    ///
    /// Refuses a quantity whose total would be out of range. The cart is
    /// left unchanged.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<QuantityChange, CartError> {
        if quantity == 0 {
            return Ok(self
                .remove(product_id)
                .map_or(QuantityChange::Missing, QuantityChange::Removed));
        }

        let Some(current) = self.get(product_id).map(|item| item.quantity) else {
            return Ok(QuantityChange::Missing);
        };
        self.try_set(product_id, current, quantity)?;
        Ok(QuantityChange::Updated)
    }

    /// Remove the item for a product, returning it if it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartItem> {
        let index = self.position(product_id)?;
        let removed = self.items.remove(index);
        // Lines are non-negative, so a smaller cart never overflows.
        if let Some(total) = self.computed_total() {
            self.total = total;
        }
        Some(removed)
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Decimal::ZERO;
    }

    /// Set an existing item's quantity, restoring `previous` on overflow.
    fn try_set(
        &mut self,
        product_id: &ProductId,
        previous: u32,
        quantity: u32,
    ) -> Result<(), CartError> {
        if let Some(item) = self.get_mut(product_id) {
            item.quantity = quantity;
        }
        match self.computed_total() {
            Some(total) => {
                self.total = total;
                Ok(())
            }
            None => {
                if let Some(item) = self.get_mut(product_id) {
                    item.quantity = previous;
                }
                Err(CartError::TotalOutOfRange)
            }
        }
    }

    fn get_mut(&mut self, product_id: &ProductId) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| &item.product_id == product_id)
    }
}

impl TryFrom<CartRecord> for Cart {
    type Error = CartError;

    fn try_from(record: CartRecord) -> Result<Self, Self::Error> {
        Self::from_record(record).map(|(cart, _)| cart)
    }
}
