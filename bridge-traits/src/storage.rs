//! Key-Value Storage Abstraction
//!
//! The playlist collection is persisted as a single serialized blob under one
//! key. Hosts provide the backing store:
//! - Web: `window.localStorage`
//! - Desktop: a JSON file in the application data directory
//! - Tests: an in-memory map
//!
//! Stores are synchronous. A read-modify-write performed by one caller runs to
//! completion inside a single execution slice, which is what keeps mutations
//! from interleaving on the single-threaded browser target.

use crate::{error::Result, platform::PlatformSendSync};

/// Origin-scoped string key-value store.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::KeyValueStore;
///
/// fn remember(store: &dyn KeyValueStore) -> bridge_traits::error::Result<()> {
///     store.set_string("playlists", "[]")?;
///     assert_eq!(store.get_string("playlists")?.as_deref(), Some("[]"));
///     Ok(())
/// }
/// ```
pub trait KeyValueStore: PlatformSendSync {
    /// Retrieve the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Implementations report a full store as
    /// [`BridgeError::QuotaExceeded`](crate::error::BridgeError::QuotaExceeded)
    /// and leave the previous value in place.
    fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<()>;

    /// Check if a value exists without returning it.
    fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use mockall::mock;

    mock! {
        Store {}

        impl KeyValueStore for Store {
            fn get_string(&self, key: &str) -> Result<Option<String>>;
            fn set_string(&self, key: &str, value: &str) -> Result<()>;
            fn remove(&self, key: &str) -> Result<()>;
        }
    }

    #[test]
    fn has_key_delegates_to_get_string() {
        let mut store = MockStore::new();
        store
            .expect_get_string()
            .withf(|key| key == "playlists")
            .returning(|_| Ok(Some("[]".to_string())));
        store
            .expect_get_string()
            .withf(|key| key == "missing")
            .returning(|_| Ok(None));

        assert!(store.has_key("playlists").unwrap());
        assert!(!store.has_key("missing").unwrap());
    }

    #[test]
    fn has_key_propagates_read_failures() {
        let mut store = MockStore::new();
        store
            .expect_get_string()
            .returning(|_| Err(BridgeError::NotAvailable("localStorage".into())));

        assert!(matches!(
            store.has_key("playlists"),
            Err(BridgeError::NotAvailable(_))
        ));
    }
}
