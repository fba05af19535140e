//! Storage Gateway
//!
//! The only component that touches persistent storage. The whole playlist
//! collection is one JSON array stored under a single key: it is always read
//! in full and written in full.

use std::collections::HashSet;
use std::sync::Arc;

use bridge_traits::{BridgeError, KeyValueStore};
use core_runtime::CoreConfig;
use tracing::{debug, warn};

use crate::error::{LibraryError, Result};
use crate::models::Playlist;

/// Reads and writes the serialized playlist collection.
#[derive(Clone)]
pub struct StorageGateway {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl StorageGateway {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.key_value_store.clone(), config.storage_key.clone())
    }

    /// Storage key the collection lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the whole collection, failing open.
    ///
    /// An absent value, an unreadable store and malformed content all yield an
    /// empty collection. Anything other than "nothing stored yet" is logged.
    pub fn load_all(&self) -> Vec<Playlist> {
        match self.try_load_all() {
            Ok(playlists) => playlists,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Treating stored collection as empty");
                Vec::new()
            }
        }
    }

    /// Load the whole collection, reporting why it could not be read.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Bridge`] if the store itself failed
    /// - [`LibraryError::MalformedData`] if the stored text is not a collection
    pub fn try_load_all(&self) -> Result<Vec<Playlist>> {
        match self.store.get_string(&self.key)? {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    /// Load for a read-modify-write cycle.
    ///
    /// Store failures propagate so an unavailable store is never overwritten
    /// with an empty collection. Malformed content is still treated as empty.
    pub(crate) fn load_for_update(&self) -> Result<Vec<Playlist>> {
        let Some(raw) = self.store.get_string(&self.key)? else {
            return Ok(Vec::new());
        };

        match decode(&raw) {
            Ok(playlists) => Ok(playlists),
            Err(e) => {
                warn!(
                    key = %self.key,
                    error = %e,
                    bytes = raw.len(),
                    "Discarding malformed collection before write"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Persist the whole collection, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Bridge`] wrapping
    /// [`BridgeError::QuotaExceeded`] when the store is full; the previous
    /// value is left in place.
    pub fn save_all(&self, playlists: &[Playlist]) -> Result<()> {
        let raw = serde_json::to_string(playlists).map_err(BridgeError::from)?;
        self.store.set_string(&self.key, &raw)?;
        debug!(
            key = %self.key,
            playlists = playlists.len(),
            bytes = raw.len(),
            "Saved collection"
        );
        Ok(())
    }
}

fn decode(raw: &str) -> Result<Vec<Playlist>> {
    let playlists: Vec<Playlist> =
        serde_json::from_str(raw).map_err(|e| LibraryError::MalformedData(e.to_string()))?;
    Ok(dedupe_by_id(playlists))
}

/// Keep the first playlist for every id.
fn dedupe_by_id(playlists: Vec<Playlist>) -> Vec<Playlist> {
    let mut seen = HashSet::with_capacity(playlists.len());
    let total = playlists.len();
    let unique: Vec<Playlist> = playlists
        .into_iter()
        .filter(|playlist| seen.insert(playlist.id))
        .collect();

    if unique.len() != total {
        warn!(
            dropped = total - unique.len(),
            "Stored collection contained duplicate playlist ids"
        );
    }
    unique
}
