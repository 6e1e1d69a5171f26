//! Key-value backend trait definition.
//!
//! The `KeyValueStore` trait is the only persistence seam FocusFlow needs:
//! every record is a single text value under a namespaced key. This keeps the
//! Session & Timer Store independent of whether the bytes end up in memory or
//! in a SQLite file.

use crate::error::Result;

/// Text key-value backend.
///
/// Implementations must ensure:
/// - `set` fully replaces any previous value (last write wins)
/// - `set_if_absent` is atomic across every handle on the same backend
/// - `remove` on an absent key succeeds
/// - values are returned exactly as written
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `FocusError::Storage` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `FocusError::Storage` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Write `value` under `key` only if nothing is stored there yet.
    ///
    /// Returns `true` when this call wrote the value and `false` when an
    /// existing value was left in place.
    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys starting with `prefix`, sorted.
    fn keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Human-readable location of the backend (for diagnostics).
    fn describe(&self) -> String;
}
