//! Durable storage slots.
//!
//! A slot is one named entry holding a single string value. The cart
//! persistence layer only ever talks to a [`StorageSlot`], so the medium
//! (a JSON file on disk, process memory, ...) can change without touching
//! the cart store.

use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tempfile::NamedTempFile;

use crate::error::{Result, StorageError};

/// Maximum length of a slot key.
pub const MAX_KEY_LENGTH: usize = 128;

/// A named, durable key-value entry.
pub trait StorageSlot: Send + Sync {
    /// Name of the slot.
    fn key(&self) -> &str;

    /// Read the stored value, or `None` if nothing has been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium could not be read.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium rejected the write.
    fn write(&self, value: &str) -> Result<()>;

    /// Delete the stored value. Removing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium could not be modified.
    fn remove(&self) -> Result<()>;
}

/// Check that a key is usable as a slot name on every medium.
///
/// Keys are 1-128 characters of ASCII letters, digits, `-`, `_` and `.`,
/// and must not start with a `.`.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] describing the first violation.
pub fn validate_key(key: &str) -> Result<()> {
    let invalid = |reason| StorageError::InvalidKey {
        key: key.to_string(),
        reason,
    };

    if key.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(invalid("must be at most 128 characters"));
    }
    if key.starts_with('.') {
        return Err(invalid("must not start with '.'"));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(invalid("may only contain ASCII letters, digits, '-', '_' and '.'"));
    }
    Ok(())
}

// =============================================================================
// File slot
// =============================================================================

/// A slot stored as `<dir>/<key>.json`.
///
/// Writes go to a uniquely named temporary file in the same directory
/// which is then renamed over the slot, so readers never observe a
/// half-written value. A failed write removes its temporary file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    key: String,
    path: PathBuf,
}

impl FileSlot {
    /// Create a slot for `key` inside `dir`. The directory is created on
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if the key fails [`validate_key`].
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Result<Self> {
        validate_key(key)?;
        Ok(Self {
            key: key.to_string(),
            path: Self::path_for(dir.as_ref(), key),
        })
    }

    /// File path used for `key` inside `dir`.
    #[must_use]
    pub fn path_for(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{key}.json"))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl StorageSlot for FileSlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io("reading slot", &self.path, e)),
        }
    }

    fn write(&self, value: &str) -> Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir).map_err(|e| StorageError::io("creating slot directory", dir, e))?;

        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|e| StorageError::io("creating temporary slot file", dir, e))?;
        temp.write_all(value.as_bytes())
            .map_err(|e| StorageError::io("writing slot", temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| StorageError::io("replacing slot", &self.path, e.error))?;

        tracing::trace!(path = %self.path.display(), bytes = value.len(), "Slot written");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io("removing slot", &self.path, e)),
        }
    }
}

// =============================================================================
// Memory slot
// =============================================================================

/// An in-process slot.
///
/// Clones share the same value, which makes it easy to open two stores on
/// one slot.
#[derive(Debug, Clone)]
pub struct MemorySlot {
    key: String,
    value: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a slot that already holds `value`.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let slot = Self::new(key);
        *slot.lock() = Some(value.into());
        slot
    }

    /// Current raw value.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageSlot for MemorySlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>> {
        Ok(self.lock().clone())
    }

    fn write(&self, value: &str) -> Result<()> {
        *self.lock() = Some(value.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("cart").is_ok());
        assert!(validate_key("guest_cart-v2.backup").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("with space").is_err());
        assert!(validate_key(&"k".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_file_slot_rejects_bad_key() {
        let dir = TempDir::new().unwrap();
        let err = FileSlot::new(dir.path(), "../cart").unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey { .. }));
    }

    #[test]
    fn test_file_slot_empty_reads_none() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path(), "cart").unwrap();
        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn test_file_slot_write_read_remove() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path().join("nested"), "cart").unwrap();

        slot.write("{\"items\":[]}").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("{\"items\":[]}"));
        assert!(slot.path().ends_with("nested/cart.json"));
        assert_eq!(fs::read_dir(slot.dir()).unwrap().count(), 1);

        slot.write("second").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("second"));

        slot.remove().unwrap();
        assert_eq!(slot.read().unwrap(), None);
        // Removing twice is fine
        slot.remove().unwrap();
    }

    #[test]
    fn test_file_slot_read_error_on_directory() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path(), "cart").unwrap();
        fs::create_dir_all(slot.path()).unwrap();

        assert!(matches!(slot.read(), Err(StorageError::Io { .. })));
    }

    #[test]
    fn test_failed_write_leaves_no_temporary_file() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path(), "cart").unwrap();
        // A directory in place of the slot file makes the final rename fail
        fs::create_dir_all(slot.path()).unwrap();

        assert!(matches!(slot.write("{}"), Err(StorageError::Io { .. })));

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, [std::ffi::OsString::from("cart.json")]);
    }

    #[test]
    fn test_memory_slot_clones_share_value() {
        let slot = MemorySlot::new("cart");
        let other = slot.clone();

        slot.write("hello").unwrap();
        assert_eq!(other.read().unwrap().as_deref(), Some("hello"));

        other.remove().unwrap();
        assert_eq!(slot.value(), None);
    }

    #[test]
    fn test_memory_slot_with_value() {
        let slot = MemorySlot::with_value("cart", "seed");
        assert_eq!(slot.key(), "cart");
        assert_eq!(slot.read().unwrap().as_deref(), Some("seed"));
    }
}
