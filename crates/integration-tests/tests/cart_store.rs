//! Integration tests for the session cart store over file-backed slots.
//!
//! These tests exercise the store the way a session does: open, mutate,
//! drop, reopen, and check that the durable slot agrees with memory.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use tempfile::TempDir;
use voltedge_core::{Cart, ProductId};
use voltedge_integration_tests::{catalog, open_store, product};
use voltedge_storefront::cart::{CartView, Toast};

// =============================================================================
// Walkthrough
// =============================================================================

#[test]
fn test_add_update_remove_walkthrough() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = open_store(dir.path());
    let p1 = product("p1", 10);

    store.add_item(&p1, 2);
    let cart = store.cart();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items().first().map(|i| i.quantity), Some(2));
    assert_eq!(cart.total(), Decimal::new(20, 0));

    store.add_item(&p1, 3);
    assert_eq!(store.cart().get(&p1.id).map(|i| i.quantity), Some(5));
    assert_eq!(store.total(), Decimal::new(50, 0));

    store.update_quantity(&p1.id, 1);
    assert_eq!(store.cart().get(&p1.id).map(|i| i.quantity), Some(1));
    assert_eq!(store.total(), Decimal::new(10, 0));

    store.remove_item(&p1.id);
    assert_eq!(store.cart(), Cart::empty());
    assert_eq!(store.total(), Decimal::ZERO);
}

// =============================================================================
// Session Lifecycle
// =============================================================================

#[test]
fn test_cart_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let products = catalog();

    let expected = {
        let (mut store, _) = open_store(dir.path());
        for (n, p) in products.iter().enumerate() {
            store.add_item(p, u32::try_from(n + 1).unwrap());
        }
        store.cart()
    };

    let (reopened, notifier) = open_store(dir.path());
    assert_eq!(reopened.cart(), expected);
    assert!(notifier.toasts().is_empty(), "loading must not emit toasts");
}

#[test]
fn test_snapshot_survives_catalog_price_change() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = open_store(dir.path());

    let mut earbuds = catalog().remove(2);
    store.add_item(&earbuds, 1);

    // Backend reprices the product after it was added
    earbuds.price = Decimal::new(1, 0);
    store.add_item(&earbuds, 1);

    let (reopened, _) = open_store(dir.path());
    let item = reopened.cart().get(&earbuds.id).cloned().unwrap();
    assert_eq!(item.product.price, Decimal::new(8950, 2));
    assert_eq!(reopened.total(), Decimal::new(17_900, 2));
}

#[test]
fn test_two_sessions_sync_only_on_reload() {
    let dir = TempDir::new().unwrap();
    let (mut first, _) = open_store(dir.path());
    let (mut second, _) = open_store(dir.path());

    first.add_item(&product("p1", 4), 2);
    assert!(second.cart().is_empty());

    second.reload();
    assert_eq!(second.total(), Decimal::new(8, 0));
}

// =============================================================================
// Notifications
// =============================================================================

#[test]
fn test_toast_sequence() {
    let dir = TempDir::new().unwrap();
    let (mut store, notifier) = open_store(dir.path());
    let [laptop, cable, _] = <[_; 3]>::try_from(catalog()).unwrap();

    store.add_item(&laptop, 1);
    store.add_item(&cable, 2);
    store.update_quantity(&cable.id, 5);
    store.update_quantity(&laptop.id, 0);
    store.remove_item(&ProductId::new("not-in-cart"));
    store.clear();

    let messages: Vec<String> = notifier.toasts().into_iter().map(|t| t.message).collect();
    assert_eq!(
        messages,
        [
            "Added to cart",
            "Added to cart",
            "Removed from cart",
            "Cart cleared"
        ]
    );
    assert_eq!(
        notifier.toasts().get(1).cloned(),
        Some(Toast::added(&cable, 2))
    );
}

// =============================================================================
// Subscriptions
// =============================================================================

#[tokio::test]
async fn test_subscriber_wakes_on_mutation() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = open_store(dir.path());
    let mut rx = store.subscribe();

    let waiter = tokio::spawn(async move {
        rx.changed().await.unwrap();
        rx.borrow_and_update().item_count()
    });

    store.add_item(&product("p1", 1), 3);
    assert_eq!(waiter.await.unwrap(), 3);
}

#[test]
fn test_subscriber_observes_final_state_of_each_call() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = open_store(dir.path());
    let rx = store.subscribe();
    let p = product("p1", 7);

    for quantity in 1..=5 {
        store.update_quantity(&p.id, quantity);
        store.add_item(&p, 1);
        let seen = rx.borrow().clone();
        assert_eq!(seen, store.cart());
        assert_eq!(Some(seen.total()), seen.computed_total());
    }
}

#[test]
fn test_oversized_add_keeps_cart_and_file() {
    let dir = TempDir::new().unwrap();
    let (mut store, notifier) = open_store(dir.path());
    let [laptop, ..] = <[_; 3]>::try_from(catalog()).unwrap();
    store.add_item(&laptop, 1);
    let before = store.cart();

    let mut rack = product("rack", 1);
    rack.price = Decimal::from_i128_with_scale(10_i128.pow(20), 0);
    assert_eq!(store.add_item(&rack, 4_000_000_000), 0);

    assert_eq!(store.cart(), before);
    assert_eq!(notifier.toasts().len(), 1);
    let (reopened, _) = open_store(dir.path());
    assert_eq!(reopened.cart(), before);
}

// =============================================================================
// Views
// =============================================================================

#[test]
fn test_view_of_stored_cart() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = open_store(dir.path());
    for p in catalog() {
        store.add_item(&p, 1);
    }

    let view = store.with_cart(|cart| CartView::new(cart, voltedge_core::CurrencyCode::USD));
    assert_eq!(view.item_count, 3);
    assert_eq!(view.subtotal, "$1402.48");
    assert_eq!(
        view.items.first().and_then(|i| i.image.clone()).as_deref(),
        Some("https://cdn.voltedge.example/laptop-14.jpg")
    );
}
