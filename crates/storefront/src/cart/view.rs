//! Display projection of a cart.
//!
//! Views carry preformatted strings so renderers never do money math.

use serde::Serialize;
use voltedge_core::{Cart, CartItem, CurrencyCode, Price};

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub category: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Build a view of `cart`, formatting prices in `currency`.
    #[must_use]
    pub fn new(cart: &Cart, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView::new(item, currency))
                .collect(),
            subtotal: Price::new(cart.total(), currency).display(),
            item_count: cart.item_count(),
        }
    }

    /// Create an empty cart view.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self::new(&Cart::empty(), currency)
    }
}

impl CartItemView {
    fn new(item: &CartItem, currency: CurrencyCode) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            name: item.product.name.clone(),
            category: item.product.category.as_ref().map(ToString::to_string),
            quantity: item.quantity,
            price: Price::new(item.product.price, currency).display(),
            // In range for every item held by a cart
            line_price: Price::new(item.line_total().unwrap_or_default(), currency).display(),
            image: item.product.primary_image().map(str::to_string),
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use voltedge_core::Product;

    use super::*;

    #[test]
    fn test_empty_view() {
        let view = CartView::empty(CurrencyCode::USD);
        assert!(view.items.is_empty());
        assert_eq!(view.subtotal, "$0.00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_formats_prices() {
        let mut cart = Cart::empty();
        cart.add(
            &Product::new("p1", "HDMI Cable", Decimal::new(1299, 2))
                .with_category("cables")
                .with_image("https://cdn.example/hdmi.jpg"),
            3,
        )
        .unwrap();
        cart.add(&Product::new("p2", "Charger", Decimal::new(25, 0)), 1)
            .unwrap();

        let view = CartView::new(&cart, CurrencyCode::GBP);
        assert_eq!(view.item_count, 4);
        assert_eq!(view.subtotal, "£63.97");

        let first = &view.items[0];
        assert_eq!(first.price, "£12.99");
        assert_eq!(first.line_price, "£38.97");
        assert_eq!(first.category.as_deref(), Some("cables"));
        assert_eq!(first.image.as_deref(), Some("https://cdn.example/hdmi.jpg"));

        assert_eq!(view.items[1].price, "£25.00");
        assert!(view.items[1].image.is_none());
    }
}
