//! `localStorage`-backed key-value store.
//!
//! Values are kept as plain strings under the caller's key, so data written
//! by other scripts on the same origin under the same key stays readable.

use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    storage::KeyValueStore,
};
use tracing::debug;

use crate::error::{js_error, window};

fn local_storage() -> BridgeResult<web_sys::Storage> {
    window()?
        .local_storage()
        .map_err(|err| js_error("localStorage", err))?
        .ok_or_else(|| BridgeError::NotAvailable("localStorage".into()))
}

/// [`KeyValueStore`] over the origin's `window.localStorage`.
#[derive(Clone)]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// Open the page's `localStorage`.
    ///
    /// Fails with [`BridgeError::NotAvailable`] when storage is disabled,
    /// e.g. by privacy settings.
    pub fn new() -> BridgeResult<Self> {
        Ok(Self {
            storage: local_storage()?,
        })
    }

    /// Wrap an existing `Storage` object (e.g. `sessionStorage`).
    pub fn from_storage(storage: web_sys::Storage) -> Self {
        Self { storage }
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|err| js_error("get_item", err))
    }

    fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|err| js_error("set_item", err))?;
        debug!(key, bytes = value.len(), "localStorage write");
        Ok(())
    }

    fn remove(&self, key: &str) -> BridgeResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|err| js_error("remove_item", err))
    }
}
