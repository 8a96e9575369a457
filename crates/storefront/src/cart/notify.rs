//! User-facing cart notifications.
//!
//! The store emits a [`Toast`] after add, remove and clear. Toasts are
//! advisory: a notifier can drop them and the mutation still stands.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use voltedge_core::{CartItem, Product};

/// Path the "View cart" action links to.
pub const CART_PATH: &str = "/cart";

/// A short notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ToastAction>,
}

/// A link rendered alongside a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastAction {
    pub label: String,
    pub href: String,
}

impl Toast {
    /// Toast for units added to the cart.
    #[must_use]
    pub fn added(product: &Product, quantity: u32) -> Self {
        Self {
            message: "Added to cart".to_string(),
            description: Some(format!("{quantity} × {}", product.name)),
            action: Some(ToastAction {
                label: "View cart".to_string(),
                href: CART_PATH.to_string(),
            }),
        }
    }

    /// Toast for an item removed from the cart.
    #[must_use]
    pub fn removed(item: &CartItem) -> Self {
        Self {
            message: "Removed from cart".to_string(),
            description: Some(item.product.name.clone()),
            action: None,
        }
    }

    /// Toast for an emptied cart.
    #[must_use]
    pub fn cleared() -> Self {
        Self {
            message: "Cart cleared".to_string(),
            description: None,
            action: None,
        }
    }
}

/// Receives toasts from the cart store.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: &Toast);
}

/// Emits toasts as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: &Toast) {
        tracing::info!(
            toast = %toast.message,
            description = toast.description.as_deref().unwrap_or_default(),
            "Toast"
        );
    }
}

/// Keeps every toast it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toasts received so far.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the toasts received so far.
    pub fn take(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: &Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast.clone());
    }
}
