//! Key-value persistence capability.

use crate::error::{MediflowError, Result};
use serde::{Serialize, de::DeserializeOwned};

/// Storage key of the consultation history list.
pub const HISTORY_KEY: &str = "mediflow_history";
/// Storage key of the user settings object.
pub const SETTINGS_KEY: &str = "mediflow_settings";

/// A local-device key-value store holding JSON text.
///
/// This trait decouples the engine from the concrete storage mechanism so the
/// history and settings stores can be exercised without touching the disk.
///
/// # Implementation Notes
///
/// Every mutating call must have reached durable storage when it returns; a
/// fresh process reading the same key must observe the write. Each write must
/// be all-or-nothing.
pub trait PersistenceStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Removes every key held by this store.
    fn clear(&self) -> Result<()>;

    /// Reads `key`, lets `apply` compute the replacement and writes it back.
    ///
    /// Stores shared between writers override this to hold their write lock
    /// across the whole read-modify-write. If `apply` fails nothing is written.
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()> {
        let next = apply(self.get(key)?)?;
        self.set(key, &next)
    }
}

/// Reads and deserializes a JSON value.
pub fn read_json<T: DeserializeOwned>(store: &dyn PersistenceStore, key: &str) -> Result<Option<T>> {
    parse_json(key, store.get(key)?.as_deref())
}

/// Deserializes a stored value; blank or missing text reads as `None`.
pub fn parse_json<T: DeserializeOwned>(key: &str, text: Option<&str>) -> Result<Option<T>> {
    match text {
        Some(text) if !text.trim().is_empty() => serde_json::from_str(text)
            .map(Some)
            .map_err(|e| MediflowError::json(format!("Failed to parse '{}': {}", key, e))),
        _ => Ok(None),
    }
}

/// Serializes and writes a JSON value.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn PersistenceStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}
