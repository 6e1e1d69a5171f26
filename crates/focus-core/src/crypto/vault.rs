//! Key lifecycle on top of a key-value store.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use super::cipher;
use super::key::VaultKey;
use crate::error::{FocusError, Result};
use crate::storage::KeyValueStore;

/// Entry name (before namespacing) holding the exported key.
pub const KEY_ENTRY: &str = "encryption_key";

/// Cipher Vault: owns the profile key and seals/opens text payloads.
///
/// The key is created lazily on the first seal and persisted before it is
/// used. Creation runs under a mutex within one vault and relies on the
/// backend's `set_if_absent` across vaults and processes, so concurrent
/// first-run callers share a single key.
pub struct CipherVault {
    store: Arc<dyn KeyValueStore>,
    key_name: String,
    cached: Mutex<Option<VaultKey>>,
}

impl CipherVault {
    /// Create a vault whose key lives under `key_name` in `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, key_name: impl Into<String>) -> Self {
        Self {
            store,
            key_name: key_name.into(),
            cached: Mutex::new(None),
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, Option<VaultKey>> {
        match self.cached.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Load the persisted key, or generate, export and persist a new one.
    pub fn get_or_create_key(&self) -> Result<VaultKey> {
        let mut cached = self.lock_cache();
        if let Some(key) = cached.as_ref() {
            return Ok(key.clone());
        }

        let stored = self
            .store
            .get(&self.key_name)
            .map_err(|e| FocusError::KeyUnavailable(format!("Failed to read key: {}", e)))?;

        let key = match stored {
            Some(exported) => {
                debug!("Loaded vault key from {}", self.key_name);
                VaultKey::import(&exported)?
            }
            None => self.create_key()?,
        };

        *cached = Some(key.clone());
        Ok(key)
    }

    /// Generate a key and persist it unless another handle got there first,
    /// in which case the stored key is adopted.
    ///
    /// Persisting happens before first use; a key that never reached the
    /// store would orphan everything sealed with it.
    fn create_key(&self) -> Result<VaultKey> {
        let candidate = VaultKey::generate()?;
        let exported = candidate.export()?;
        let inserted = self
            .store
            .set_if_absent(&self.key_name, &exported)
            .map_err(|e| FocusError::KeyUnavailable(format!("Failed to persist key: {}", e)))?;
        if inserted {
            info!("Generated new vault key ({})", candidate.fingerprint());
            return Ok(candidate);
        }

        let winner = self
            .store
            .get(&self.key_name)
            .map_err(|e| FocusError::KeyUnavailable(format!("Failed to read key: {}", e)))?
            .ok_or_else(|| {
                FocusError::KeyUnavailable("Key was removed while being created".to_string())
            })?;
        let key = VaultKey::import(&winner)?;
        debug!("Adopted vault key {} created concurrently", key.fingerprint());
        Ok(key)
    }

    /// Load the persisted key without creating one.
    ///
    /// Returns `KeyUnavailable` when no key has been stored yet; there is
    /// nothing a fresh key could decrypt.
    pub fn existing_key(&self) -> Result<VaultKey> {
        let mut cached = self.lock_cache();
        if let Some(key) = cached.as_ref() {
            return Ok(key.clone());
        }

        let exported = self
            .store
            .get(&self.key_name)
            .map_err(|e| FocusError::KeyUnavailable(format!("Failed to read key: {}", e)))?
            .ok_or_else(|| FocusError::KeyUnavailable("No key has been created".to_string()))?;

        let key = VaultKey::import(&exported)?;
        *cached = Some(key.clone());
        Ok(key)
    }

    /// Seal text under the profile key, creating the key if needed.
    pub fn seal(&self, plaintext: &str) -> Result<String> {
        let key = self.get_or_create_key()?;
        cipher::seal(plaintext.as_bytes(), &key)
    }

    /// Open text sealed by [`CipherVault::seal`].
    pub fn open(&self, sealed: &str) -> Result<String> {
        let key = self.existing_key()?;
        let plaintext = cipher::open(sealed, &key)?;
        String::from_utf8(plaintext)
            .map_err(|e| FocusError::DecodeError(format!("Plaintext is not UTF-8: {}", e)))
    }

    /// Fingerprint of the persisted key, if one exists.
    pub fn key_fingerprint(&self) -> Result<Option<String>> {
        match self.existing_key() {
            Ok(key) => Ok(Some(key.fingerprint())),
            Err(FocusError::KeyUnavailable(_)) if !self.has_stored_key()? => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn has_stored_key(&self) -> Result<bool> {
        Ok(self.store.get(&self.key_name)?.is_some())
    }

    /// Remove the persisted key and drop the cached copy.
    pub fn forget_key(&self) -> Result<()> {
        let mut cached = self.lock_cache();
        self.store.remove(&self.key_name)?;
        *cached = None;
        info!("Vault key removed");
        Ok(())
    }
}

impl std::fmt::Debug for CipherVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherVault")
            .field("store", &self.store.describe())
            .field("key_name", &self.key_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn vault() -> (Arc<MemoryStore>, CipherVault) {
        let store = Arc::new(MemoryStore::new());
        let vault = CipherVault::new(store.clone(), "test_encryption_key");
        (store, vault)
    }

    #[test]
    fn test_key_is_persisted_on_creation() {
        let (store, vault) = vault();
        assert!(store.get("test_encryption_key").unwrap().is_none());

        let key = vault.get_or_create_key().unwrap();
        let stored = store.get("test_encryption_key").unwrap().unwrap();
        assert_eq!(VaultKey::import(&stored).unwrap().as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_second_vault_reuses_persisted_key() {
        let (store, vault) = vault();
        let sealed = vault.seal("history").unwrap();

        let reopened = CipherVault::new(store, "test_encryption_key");
        assert_eq!(reopened.open(&sealed).unwrap(), "history");
    }

    #[test]
    fn test_open_without_key_is_unavailable() {
        let (_store, vault) = vault();
        let result = vault.open("AAAA");
        assert!(matches!(result, Err(FocusError::KeyUnavailable(_))));
        assert_eq!(vault.key_fingerprint().unwrap(), None);
    }

    #[test]
    fn test_forget_key_creates_new_key_next_time() {
        let (_store, vault) = vault();
        let first = vault.get_or_create_key().unwrap().fingerprint();
        vault.forget_key().unwrap();
        assert_eq!(vault.key_fingerprint().unwrap(), None);

        let second = vault.get_or_create_key().unwrap().fingerprint();
        assert_ne!(first, second);
    }

    #[test]
    fn test_corrupt_stored_key_is_not_replaced() {
        let (store, vault) = vault();
        store.set("test_encryption_key", "{broken").unwrap();

        let result = vault.get_or_create_key();
        assert!(matches!(result, Err(FocusError::KeyUnavailable(_))));
        assert_eq!(store.get("test_encryption_key").unwrap().unwrap(), "{broken");
    }

    /// Backend where another writer stores its key between our read and our write.
    struct ContendedStore {
        inner: MemoryStore,
        competitor: String,
    }

    impl KeyValueStore for ContendedStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value)
        }

        fn set_if_absent(&self, key: &str, value: &str) -> Result<bool> {
            self.inner.set_if_absent(key, &self.competitor)?;
            self.inner.set_if_absent(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }

        fn keys(&self, prefix: &str) -> Result<Vec<String>> {
            self.inner.keys(prefix)
        }

        fn describe(&self) -> String {
            "contended".to_string()
        }
    }

    #[test]
    fn test_losing_creation_race_adopts_stored_key() {
        let competitor = VaultKey::generate().unwrap();
        let store = Arc::new(ContendedStore {
            inner: MemoryStore::new(),
            competitor: competitor.export().unwrap(),
        });
        let vault = CipherVault::new(store.clone(), "test_encryption_key");

        let key = vault.get_or_create_key().unwrap();
        assert_eq!(key.as_bytes(), competitor.as_bytes());

        let sealed = vault.seal("history").unwrap();
        let other = CipherVault::new(store, "test_encryption_key");
        assert_eq!(other.open(&sealed).unwrap(), "history");
    }
}
