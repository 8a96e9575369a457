//! VoltEdge Core - Shared cart and catalog types.
//!
//! This crate provides the domain types used across VoltEdge components:
//! - `storefront` - Cart store, persistence and notifications
//! - `cli` - Command-line session driver for the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure transforms - no I/O, no
//! storage access, no logging. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, product snapshots and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
