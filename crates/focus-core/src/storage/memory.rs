//! In-memory backend.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{FocusError, Result};
use crate::storage::traits::KeyValueStore;

/// Volatile key-value store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_entries(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| FocusError::Storage("Memory store poisoned".to_string()))
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock_entries().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock_entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool> {
        match self.lock_entries()?.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                Ok(true)
            }
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock_entries()?.remove(key);
        Ok(())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .lock_entries()?
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_value() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_if_absent_does_not_overwrite() {
        let store = MemoryStore::new();
        assert!(store.set_if_absent("k", "first").unwrap());
        assert!(!store.set_if_absent("k", "second").unwrap());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn test_remove_absent_is_ok() {
        let store = MemoryStore::new();
        store.remove("missing").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_keys_filters_by_prefix() {
        let store = MemoryStore::new();
        store.set("focusflow_sessions", "x").unwrap();
        store.set("focusflow_events", "y").unwrap();
        store.set("other_sessions", "z").unwrap();

        let keys = store.keys("focusflow_").unwrap();
        assert_eq!(keys, vec!["focusflow_events", "focusflow_sessions"]);
    }
}
