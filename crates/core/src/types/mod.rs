//! Core types for VoltEdge.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartError, CartItem, CartRecord, QuantityChange};
pub use id::*;
pub use price::{CurrencyCode, CurrencyError, Price};
pub use product::Product;
