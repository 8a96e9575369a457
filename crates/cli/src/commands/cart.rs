//! Session cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Add two units of a product (snapshot taken from the arguments)
//! ve-cli cart add --id p1 --name "USB-C Cable" --price 10 --quantity 2
//!
//! # Set an absolute quantity (0 removes the item)
//! ve-cli cart update --id p1 --quantity 1
//!
//! # Remove an item, empty the cart, show it
//! ve-cli cart remove --id p1
//! ve-cli cart clear
//! ve-cli cart show --json
//! ```
//!
//! # Environment Variables
//!
//! - `VOLTEDGE_CART_DIR` - Directory holding the cart slot
//! - `VOLTEDGE_CART_KEY` - Slot key (default: cart)
//! - `VOLTEDGE_CURRENCY` - Currency used for display

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use voltedge_core::{CurrencyCode, Product, ProductId};
use voltedge_storefront::cart::{CartStore, CartView, FileSlot, RecordingNotifier, Toast};
use voltedge_storefront::config::StorefrontConfig;
use voltedge_storefront::error::StorageError;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Slot could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart could not be encoded for output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Argument failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Product fields supplied on the command line.
#[derive(Debug, Clone)]
pub struct ProductArgs {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub category: Option<String>,
    pub images: Vec<String>,
}

impl ProductArgs {
    fn into_product(self) -> Result<Product, CartCommandError> {
        if self.name.trim().is_empty() {
            return Err(CartCommandError::InvalidArgument(
                "name must not be empty".to_string(),
            ));
        }
        if self.price < Decimal::ZERO {
            return Err(CartCommandError::InvalidArgument(format!(
                "price must not be negative (got {})",
                self.price
            )));
        }

        let mut product = Product::new(self.id, self.name.trim(), self.price);
        if let Some(category) = self.category {
            product = product.with_category(category.as_str());
        }
        for image in self.images {
            product = product.with_image(image);
        }
        Ok(product)
    }
}

/// A cart operation.
#[derive(Debug, Clone)]
pub enum CartOp {
    Show,
    Add { product: ProductArgs, quantity: u32 },
    Update { id: ProductId, quantity: u32 },
    Remove { id: ProductId },
    Clear,
}

/// How the resulting cart is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// One invocation's view of the session cart.
pub struct CartSession {
    store: CartStore<FileSlot>,
    notifier: RecordingNotifier,
    currency: CurrencyCode,
}

impl CartSession {
    /// Open the cart slot described by `config`, optionally in another directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured slot key is invalid.
    pub fn open(
        config: &StorefrontConfig,
        dir_override: Option<PathBuf>,
    ) -> Result<Self, CartCommandError> {
        let dir = dir_override.unwrap_or_else(|| config.cart_dir.clone());
        let slot = FileSlot::new(&dir, &config.cart_key)?;
        tracing::debug!(path = %slot.path().display(), "Opening cart slot");

        let notifier = RecordingNotifier::new();
        let store = CartStore::open(slot, Arc::new(notifier.clone()));

        Ok(Self {
            store,
            notifier,
            currency: config.currency,
        })
    }

    /// Apply `op` and render the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or JSON output fails.
    pub fn run(&mut self, op: CartOp, format: OutputFormat) -> Result<String, CartCommandError> {
        let mut notes = Vec::new();

        match op {
            CartOp::Show => {}
            CartOp::Add { product, quantity } => {
                if quantity == 0 {
                    return Err(CartCommandError::InvalidArgument(
                        "quantity must be at least 1".to_string(),
                    ));
                }
                let product = product.into_product()?;
                let before = self.store.item_count();
                self.store.add_item(&product, quantity);
                if self.store.item_count() == before {
                    notes.push(format!(
                        "Product {} was not added: the cart cannot hold that many",
                        product.id
                    ));
                }
            }
            CartOp::Update { id, quantity } => {
                if !self.store.update_quantity(&id, quantity) {
                    if self.store.with_cart(|cart| cart.get(&id).is_some()) {
                        notes.push(format!(
                            "Product {id} was not updated: the cart cannot hold that many"
                        ));
                    } else {
                        notes.push(format!("Product {id} is not in the cart"));
                    }
                }
            }
            CartOp::Remove { id } => {
                if self.store.remove_item(&id).is_none() {
                    notes.push(format!("Product {id} is not in the cart"));
                }
            }
            CartOp::Clear => self.store.clear(),
        }

        let toasts = self.notifier.take();
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&self.store.cart())?),
            OutputFormat::Table => {
                let view = self.store.with_cart(|cart| CartView::new(cart, self.currency));
                Ok(render(&toasts, &notes, &view))
            }
        }
    }
}

/// Render toasts, notes and the cart as plain text.
#[must_use]
pub fn render(toasts: &[Toast], notes: &[String], view: &CartView) -> String {
    let mut out = String::new();

    for toast in toasts {
        match &toast.description {
            Some(description) => {
                let _ = writeln!(out, "* {}: {description}", toast.message);
            }
            None => {
                let _ = writeln!(out, "* {}", toast.message);
            }
        }
    }
    for note in notes {
        let _ = writeln!(out, "! {note}");
    }
    if !toasts.is_empty() || !notes.is_empty() {
        out.push('\n');
    }

    if view.items.is_empty() {
        let _ = writeln!(out, "Your cart is empty.");
        return out;
    }

    for item in &view.items {
        let _ = writeln!(
            out,
            "{:<12} {:<32} {:>4} x {:>10} = {:>10}",
            item.product_id, item.name, item.quantity, item.price, item.line_price
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), subtotal {}",
        view.item_count, view.subtotal
    );
    out
}
