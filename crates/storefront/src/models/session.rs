//! Session-related types.
//!
//! Keys for the durable storage slots a session owns.

/// Storage slot keys.
pub mod keys {
    /// Key for the session cart.
    pub const CART: &str = "cart";
}
