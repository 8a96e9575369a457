//! Integration tests for the VoltEdge session cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p voltedge-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Store behaviour over file-backed slots
//! - `cart_persistence` - Slot contents, corruption and recovery
//!
//! Shared fixtures live in this crate so that each test file stays short.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use voltedge_core::Product;
use voltedge_storefront::cart::{CartStore, FileSlot, RecordingNotifier};

/// A catalog of products used across tests.
#[must_use]
pub fn catalog() -> Vec<Product> {
    vec![
        Product::new("laptop-14", "UltraBook 14", Decimal::new(129_999, 2))
            .with_category("laptops")
            .with_image("https://cdn.voltedge.example/laptop-14.jpg"),
        Product::new("usb-c-cable", "USB-C Cable 2m", Decimal::new(1299, 2))
            .with_category("cables"),
        Product::new("earbuds", "Wireless Earbuds", Decimal::new(8950, 2))
            .with_category("audio"),
    ]
}

/// A product with an integer price, for arithmetic-friendly scenarios.
#[must_use]
pub fn product(id: &str, price: i64) -> Product {
    Product::new(id, format!("Product {id}"), Decimal::new(price, 0))
}

/// Open a store on the `cart` slot in `dir`.
///
/// # Panics
///
/// Panics if the slot key is rejected, which never happens for `cart`.
#[must_use]
#[allow(clippy::expect_used)]
pub fn open_store(dir: &Path) -> (CartStore<FileSlot>, RecordingNotifier) {
    let slot = FileSlot::new(dir, "cart").expect("valid slot key");
    let notifier = RecordingNotifier::new();
    let store = CartStore::open(slot, Arc::new(notifier.clone()));
    (store, notifier)
}
