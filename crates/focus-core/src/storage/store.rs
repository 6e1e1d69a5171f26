//! Session & Timer Store.
//!
//! Typed access to the FocusFlow key-value entries. History collections
//! (`sessions`, `events`) are sealed by the [`CipherVault`]; the timer snapshot
//! and onboarding flag are plain JSON.
//!
//! Loads of history are fail soft: any failure yields an empty collection and
//! a diagnostic so a corrupted history never blocks a new session. Saves
//! always surface errors.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::crypto::{CipherVault, KEY_ENTRY};
use crate::error::{FocusError, Result};
use crate::storage::traits::KeyValueStore;
use crate::storage::types::{DistractionEvent, Session, TimerSnapshot};

/// Default application namespace for persisted keys.
pub const DEFAULT_NAMESPACE: &str = "focusflow";

const SESSIONS_ENTRY: &str = "sessions";
const EVENTS_ENTRY: &str = "events";
const TIMER_ENTRY: &str = "timer_state";
const ONBOARDING_ENTRY: &str = "onboarding_complete";

/// Result of a fail-soft load.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    /// Why the value fell back to its default, if it did
    pub diagnostic: Option<String>,
}

impl<T> Loaded<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            diagnostic: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.diagnostic.is_some()
    }
}

/// Typed store over a namespaced key-value backend.
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
    vault: CipherVault,
    namespace: String,
}

impl SessionStore {
    /// Store using the default `focusflow` namespace.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_namespace(backend, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(backend: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        let namespace = namespace.to_string();
        let vault = CipherVault::new(backend.clone(), format!("{}_{}", namespace, KEY_ENTRY));
        Self {
            backend,
            vault,
            namespace,
        }
    }

    fn entry(&self, name: &str) -> String {
        format!("{}_{}", self.namespace, name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn vault(&self) -> &CipherVault {
        &self.vault
    }

    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    // --- Encrypted collections ---

    fn save_sealed<T: Serialize>(&self, name: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        let sealed = self.vault.seal(&json)?;
        self.backend.set(&self.entry(name), &sealed)?;
        debug!("Saved {} {} record(s)", items.len(), name);
        Ok(())
    }

    fn try_load_sealed<T: DeserializeOwned>(&self, name: &str) -> Result<Option<Vec<T>>> {
        let Some(sealed) = self.backend.get(&self.entry(name))? else {
            return Ok(None);
        };
        let json = self.vault.open(&sealed)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn load_sealed<T: DeserializeOwned>(&self, name: &str) -> Loaded<Vec<T>> {
        match self.try_load_sealed(name) {
            Ok(Some(items)) => Loaded::ok(items),
            Ok(None) => Loaded::ok(Vec::new()),
            Err(e) => {
                let diagnostic = format!("Could not load {}: {}", name, e);
                warn!("{}", diagnostic);
                Loaded {
                    value: Vec::new(),
                    diagnostic: Some(diagnostic),
                }
            }
        }
    }

    /// Load a collection that is about to be extended and saved back.
    ///
    /// Corrupt blobs start over as empty (they can never be read again);
    /// any other failure is returned so a transient read error cannot wipe
    /// recoverable history.
    fn load_sealed_for_update<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        match self.try_load_sealed(name) {
            Ok(items) => Ok(items.unwrap_or_default()),
            Err(e) if e.is_corrupt_data() => {
                warn!("Replacing unreadable {}: {}", name, e);
                Ok(Vec::new())
            }
            Err(FocusError::KeyUnavailable(reason)) => {
                if self.vault.key_fingerprint()?.is_some() {
                    return Err(FocusError::KeyUnavailable(reason));
                }
                // The key is gone for good, so nothing could ever open the blob.
                warn!("Replacing {} sealed under a lost key: {}", name, reason);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Seal and persist the full session collection.
    pub fn save_sessions(&self, sessions: &[Session]) -> Result<()> {
        self.save_sealed(SESSIONS_ENTRY, sessions)
    }

    /// Load the session collection; empty with a diagnostic on failure.
    pub fn load_sessions(&self) -> Loaded<Vec<Session>> {
        self.load_sealed(SESSIONS_ENTRY)
    }

    /// Sessions to append to; see [`SessionStore::events_for_update`].
    pub fn sessions_for_update(&self) -> Result<Vec<Session>> {
        self.load_sealed_for_update(SESSIONS_ENTRY)
    }

    pub fn save_events(&self, events: &[DistractionEvent]) -> Result<()> {
        self.save_sealed(EVENTS_ENTRY, events)
    }

    pub fn load_events(&self) -> Loaded<Vec<DistractionEvent>> {
        self.load_sealed(EVENTS_ENTRY)
    }

    /// Events to append to. Empty when the stored blob is corrupt; an error
    /// when the backend or key cannot be read right now.
    pub fn events_for_update(&self) -> Result<Vec<DistractionEvent>> {
        self.load_sealed_for_update(EVENTS_ENTRY)
    }

    // --- Timer snapshot (plain JSON) ---

    pub fn save_timer_snapshot(&self, snapshot: &TimerSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.backend.set(&self.entry(TIMER_ENTRY), &json)
    }

    /// Load the snapshot. Unreadable or inconsistent snapshots load as absent.
    pub fn load_timer_snapshot(&self) -> Result<Option<TimerSnapshot>> {
        let Some(json) = self.backend.get(&self.entry(TIMER_ENTRY))? else {
            return Ok(None);
        };

        match serde_json::from_str::<TimerSnapshot>(&json) {
            Ok(snapshot) if snapshot.is_consistent() => Ok(Some(snapshot)),
            Ok(_) => {
                warn!("Ignoring inconsistent timer snapshot");
                Ok(None)
            }
            Err(e) => {
                warn!("Ignoring unreadable timer snapshot: {}", e);
                Ok(None)
            }
        }
    }

    /// Remove the snapshot. Clearing an absent snapshot is a no-op.
    pub fn clear_timer_snapshot(&self) -> Result<()> {
        self.backend.remove(&self.entry(TIMER_ENTRY))
    }

    // --- Flags and erasure ---

    pub fn is_onboarding_complete(&self) -> Result<bool> {
        Ok(self
            .backend
            .get(&self.entry(ONBOARDING_ENTRY))?
            .map(|value| value.trim() == "true")
            .unwrap_or(false))
    }

    pub fn mark_onboarding_complete(&self) -> Result<()> {
        self.backend.set(&self.entry(ONBOARDING_ENTRY), "true")
    }

    /// Remove every FocusFlow entry, including the vault key.
    pub fn erase_all(&self) -> Result<()> {
        for name in [SESSIONS_ENTRY, EVENTS_ENTRY, TIMER_ENTRY, ONBOARDING_ENTRY] {
            self.backend.remove(&self.entry(name))?;
        }
        self.vault.forget_key()?;
        info!("Erased all data in namespace {}", self.namespace);
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("backend", &self.backend.describe())
            .field("namespace", &self.namespace)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::{EventType, Mood};
    use crate::storage::MemoryStore;
    use chrono::Utc;
    use uuid::Uuid;

    fn store() -> (Arc<MemoryStore>, SessionStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = SessionStore::new(backend.clone());
        (backend, store)
    }

    fn sample_session(title: &str) -> Session {
        Session {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: Some(Utc::now()),
            duration_sec: Some(1500),
            task_title: Some(title.to_string()),
            distracted_count: 1,
            reflection: Some("ok".to_string()),
            mood: Some(Mood::Mixed),
        }
    }

    #[test]
    fn test_update_load_replaces_corrupt_blob() {
        let (backend, store) = store();
        store.save_sessions(&[sample_session("kept")]).unwrap();
        backend.set("focusflow_sessions", "not base64 at all").unwrap();

        assert!(store.sessions_for_update().unwrap().is_empty());
    }

    #[test]
    fn test_update_load_after_lost_key_starts_over() {
        let (backend, store) = store();
        store.save_sessions(&[sample_session("kept")]).unwrap();
        backend.remove("focusflow_encryption_key").unwrap();

        let reopened = SessionStore::new(backend);
        assert!(reopened.sessions_for_update().unwrap().is_empty());
    }

    #[test]
    fn test_first_run_loads_empty_without_key() {
        let (backend, store) = store();
        let loaded = store.load_sessions();
        assert!(loaded.value.is_empty());
        assert!(!loaded.is_degraded());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_sessions_are_sealed_at_rest() {
        let (backend, store) = store();
        store.save_sessions(&[sample_session("write report")]).unwrap();

        let raw = backend.get("focusflow_sessions").unwrap().unwrap();
        assert!(!raw.contains("write report"));
        assert!(backend.get("focusflow_encryption_key").unwrap().is_some());

        let loaded = store.load_sessions();
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.value[0].task_title.as_deref(), Some("write report"));
    }

    #[test]
    fn test_corrupt_events_fall_back_to_empty() {
        let (backend, store) = store();
        let event = DistractionEvent {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type: EventType::Manual,
        };
        store.save_events(&[event]).unwrap();
        backend.set("focusflow_events", "bm90IGEgYmxvYg==").unwrap();

        let loaded = store.load_events();
        assert!(loaded.value.is_empty());
        assert!(loaded.diagnostic.unwrap().contains("events"));
    }

    #[test]
    fn test_snapshot_is_plaintext() {
        let (backend, store) = store();
        let snapshot = TimerSnapshot {
            is_running: true,
            is_paused: false,
            current_session_id: Some(Uuid::new_v4()),
            start_time: Utc::now(),
            paused_time: None,
            duration: 600,
            elapsed_when_paused: 0,
            task_title: None,
        };
        store.save_timer_snapshot(&snapshot).unwrap();

        let raw = backend.get("focusflow_timer_state").unwrap().unwrap();
        assert!(raw.contains("\"duration\":600"));
        assert!(backend.get("focusflow_encryption_key").unwrap().is_none());
    }

    #[test]
    fn test_garbage_snapshot_loads_absent() {
        let (backend, store) = store();
        backend.set("focusflow_timer_state", "{not json").unwrap();
        assert_eq!(store.load_timer_snapshot().unwrap(), None);
    }

    #[test]
    fn test_onboarding_flag() {
        let (_backend, store) = store();
        assert!(!store.is_onboarding_complete().unwrap());
        store.mark_onboarding_complete().unwrap();
        assert!(store.is_onboarding_complete().unwrap());
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let backend = Arc::new(MemoryStore::new());
        let work = SessionStore::with_namespace(backend.clone(), "work");
        let home = SessionStore::with_namespace(backend.clone(), "home");

        work.save_sessions(&[sample_session("deploy")]).unwrap();
        assert_eq!(work.load_sessions().value.len(), 1);
        assert!(home.load_sessions().value.is_empty());
        assert!(backend.get("work_encryption_key").unwrap().is_some());
        assert!(backend.get("home_encryption_key").unwrap().is_none());
    }

    #[test]
    fn test_erase_all_removes_everything() {
        let (backend, store) = store();
        store.save_sessions(&[sample_session("a")]).unwrap();
        store.mark_onboarding_complete().unwrap();

        store.erase_all().unwrap();
        assert!(backend.keys("focusflow_").unwrap().is_empty());
        assert!(store.load_sessions().value.is_empty());
    }
}
