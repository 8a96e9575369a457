//! Product snapshot carried by cart items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// A product as fetched from the catalog API.
///
/// Carts copy this value at add-time. Price or name edits made on the
/// backend later do not change items that are already in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Category the product is listed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    /// Image URLs, primary image first.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Create a product with no category and no images.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: None,
            images: Vec::new(),
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Append an image URL.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    /// The primary image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_product() {
        let json = r#"{"id":"p1","name":"USB-C Cable","price":"12.50"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.price, Decimal::new(1250, 2));
        assert!(product.category.is_none());
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_deserialize_numeric_price() {
        let json = r#"{"id":"p1","name":"Headphones","price":89.99}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(8999, 2));
    }

    #[test]
    fn test_primary_image() {
        let product = Product::new("p1", "Monitor", Decimal::ONE)
            .with_image("https://cdn.example/a.jpg")
            .with_image("https://cdn.example/b.jpg");
        assert_eq!(product.primary_image(), Some("https://cdn.example/a.jpg"));
    }
}
