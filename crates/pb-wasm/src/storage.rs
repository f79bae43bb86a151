//! `localStorage` backend for the persistence adapter.

use pb_core::storage::{KeyValueStore, StorageError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

/// Browser `localStorage`. Private browsing modes may deny access; every
/// call then fails with [`StorageError::Unavailable`] and the app runs on
/// in-memory state.
#[derive(Clone)]
pub struct LocalStorage {
    inner: Option<Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let inner = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if inner.is_none() {
            log::warn!("localStorage unavailable; changes will not persist");
        }
        Self { inner }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.inner.as_ref().ok_or(StorageError::Unavailable)
    }
}

fn backend_error(key: &str, bytes: usize, err: JsValue) -> StorageError {
    if let Some(dom) = err.dyn_ref::<DomException>() {
        if dom.name() == "QuotaExceededError" {
            return StorageError::QuotaExceeded {
                key: key.to_string(),
                bytes,
            };
        }
        return StorageError::Backend {
            message: dom.message(),
        };
    }
    StorageError::Backend {
        message: format!("{err:?}"),
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| backend_error(key, 0, e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| backend_error(key, value.len(), e))
    }
}
