//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VOLTEDGE_CART_DIR` - Directory holding durable storage slots (default: .voltedge)
//! - `VOLTEDGE_CART_KEY` - Storage slot key for the cart (default: cart)
//! - `VOLTEDGE_CURRENCY` - ISO 4217 code used to format prices (default: USD)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g., production)

use std::path::PathBuf;

use thiserror::Error;
use voltedge_core::CurrencyCode;

use crate::cart::slot;
use crate::models::session_keys;

/// Default directory for storage slots, relative to the working directory.
pub const DEFAULT_CART_DIR: &str = ".voltedge";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding durable storage slots
    pub cart_dir: PathBuf,
    /// Storage slot key for the session cart
    pub cart_key: String,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            cart_dir: PathBuf::from(DEFAULT_CART_DIR),
            cart_key: session_keys::CART.to_string(),
            currency: CurrencyCode::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cart_dir = PathBuf::from(get_or_default("VOLTEDGE_CART_DIR", DEFAULT_CART_DIR));

        let cart_key = get_or_default("VOLTEDGE_CART_KEY", session_keys::CART);
        slot::validate_key(&cart_key).map_err(|e| {
            ConfigError::InvalidEnvVar("VOLTEDGE_CART_KEY".to_string(), e.to_string())
        })?;

        let currency = get_or_default("VOLTEDGE_CURRENCY", CurrencyCode::default().code())
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VOLTEDGE_CURRENCY".to_string(), e.to_string())
            })?;

        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.trim().is_empty());
        let sentry_environment = lookup("SENTRY_ENVIRONMENT");

        Ok(Self {
            cart_dir,
            cart_key,
            currency,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Path of the file backing the cart slot.
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        slot::FileSlot::path_for(&self.cart_dir, &self.cart_key)
    }
}
