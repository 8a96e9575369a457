//! Storage error handling with Sentry integration.
//!
//! Storage failures never reach callers of the cart store. The persistence
//! layer logs them through [`report`], which also forwards them to Sentry
//! when it is configured.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a storage slot or by cart encoding.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error {context} ({}): {source}", .path.display())]
    Io {
        /// What was being attempted.
        context: &'static str,
        /// File involved.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cart could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored cart decoded but breaks the cart invariants.
    #[error("Invalid saved cart: {0}")]
    InvalidCart(#[from] voltedge_core::CartError),

    /// Slot key is not usable as a storage name.
    #[error("Invalid slot key {key:?}: {reason}")]
    InvalidKey {
        /// The offending key.
        key: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The storage medium refused the operation (quota, read-only, ...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for `StorageError`.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Log a swallowed storage error.
///
/// The Sentry tracing layer installed by [`crate::telemetry::init_tracing`]
/// turns this error event into a single Sentry event.
pub fn report(operation: &'static str, key: &str, error: &StorageError) {
    tracing::error!(
        operation,
        slot = key,
        error = %error,
        "Cart storage error"
    );
}

/// Add a breadcrumb for cart actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some("cart".to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
