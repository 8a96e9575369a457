//! Session cart: store, persistence, notifications and views.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use rust_decimal::Decimal;
//! use voltedge_core::Product;
//! use voltedge_storefront::cart::{CartStore, MemorySlot, TracingNotifier};
//!
//! let mut store = CartStore::open(MemorySlot::new("cart"), Arc::new(TracingNotifier));
//! let cable = Product::new("p1", "USB-C Cable", Decimal::new(10, 0));
//!
//! store.add_item(&cable, 2);
//! store.add_item(&cable, 3);
//! assert_eq!(store.total(), Decimal::new(50, 0));
//!
//! store.update_quantity(&cable.id, 1);
//! assert_eq!(store.total(), Decimal::new(10, 0));
//!
//! store.remove_item(&cable.id);
//! assert!(store.cart().is_empty());
//! ```

pub mod notify;
pub mod persistence;
pub mod slot;
pub mod store;
pub mod view;

pub use notify::{Notifier, RecordingNotifier, Toast, ToastAction, TracingNotifier};
pub use persistence::CartPersistence;
pub use slot::{FileSlot, MemorySlot, StorageSlot};
pub use store::CartStore;
pub use view::{CartItemView, CartView};
