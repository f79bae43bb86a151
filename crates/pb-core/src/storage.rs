//! Persistence adapter over a string key-value store.
//!
//! Every record is stored as JSON under its own key and loaded
//! independently. Saving is best effort: failures are logged and the app
//! keeps running on in-memory state.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Storage keys used by the app.
pub mod keys {
    pub const NOTES: &str = "notes";
    pub const CATEGORIES: &str = "categories";
    pub const SETTINGS: &str = "settings";
    pub const WHITEBOARD: &str = "whiteboardState";
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("quota exceeded writing {key} ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },

    #[error("storage backend error: {message}")]
    Backend { message: String },

    #[error("storage is unavailable")]
    Unavailable,
}

/// A string key-value store (browser `localStorage`, or memory in tests).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Typed JSON load/save on top of a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize and write `value`. Errors are logged, never propagated;
    /// returns whether the write went through.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        match self.try_save(key, value) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving {key}: {e}");
                false
            }
        }
    }

    pub fn try_save<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }

    /// Read and deserialize `key`, falling back to `default` when the key is
    /// missing or its content does not parse.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    log::error!("Error loading {key}: {e}");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                log::error!("Error loading {key}: {e}");
                default
            }
        }
    }
}

// ─── In-memory store ─────────────────────────────────────────────────────

/// Shared in-memory store. Clones share the same entries, so a note board
/// and a whiteboard can persist into one store like they share
/// `localStorage` in the browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    writes: HashMap<String, usize>,
}

impl MemoryInner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once the total stored bytes would exceed
    /// `bytes`, like a full `localStorage`.
    pub fn with_quota(bytes: usize) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().quota = Some(bytes);
        store
    }

    /// Number of successful writes to `key`.
    pub fn write_count(&self, key: &str) -> usize {
        self.inner.borrow().writes.get(key).copied().unwrap_or(0)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Seed a raw value without counting it as a write.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(quota) = inner.quota {
            let bytes = inner.used_bytes_without(key) + key.len() + value.len();
            if bytes > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    bytes,
                });
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        *inner.writes.entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Settings;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn save_then_load() {
        let mut p = Persistence::new(MemoryStore::new());
        assert!(p.save(keys::CATEGORIES, &vec!["work", "ideas"]));
        let loaded: Vec<String> = p.load(keys::CATEGORIES, Vec::new());
        assert_eq!(loaded, vec!["work", "ideas"]);
        assert_eq!(p.store().write_count(keys::CATEGORIES), 1);
    }

    #[test]
    fn missing_key_returns_default() {
        let p = Persistence::new(MemoryStore::new());
        let settings: Settings = p.load(keys::SETTINGS, Settings::default());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn corrupt_value_returns_default() {
        init_logs();
        let store = MemoryStore::new();
        store.insert_raw(keys::CATEGORIES, "{not json");
        let p = Persistence::new(store);
        let loaded: Vec<String> = p.load(keys::CATEGORIES, vec!["other".to_string()]);
        assert_eq!(loaded, vec!["other"]);
    }

    #[test]
    fn quota_failure_is_swallowed() {
        init_logs();
        let mut p = Persistence::new(MemoryStore::with_quota(16));
        assert!(!p.save(keys::NOTES, &"a long value that does not fit"));
        assert_eq!(p.store().raw(keys::NOTES), None);
        assert!(matches!(
            p.try_save(keys::NOTES, &"still too long for the quota"),
            Err(StorageError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let mut a = Persistence::new(store.clone());
        a.save(keys::SETTINGS, &Settings::default());
        let b = Persistence::new(store);
        assert!(b.store().raw(keys::SETTINGS).is_some());
    }
}
