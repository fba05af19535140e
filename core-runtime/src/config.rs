//! # Core Configuration Module
//!
//! Provides configuration management for the disc core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the injected bridges and the user-facing defaults. It
//! enforces fail-fast validation so a host that forgot to provide a store is
//! rejected before any playlist is read or written.
//!
//! ## Required Dependencies
//!
//! - `KeyValueStore` - Persistence for the playlist collection
//! - `MediaRegistry` - Session-scoped handles for uploaded audio and covers
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `Clock` - Creation timestamps (default: [`SystemClock`])
//!
//! When the `desktop-shims` feature is enabled, a `JsonFileStore` in the
//! platform data directory and an in-memory `MemoryMediaRegistry` are injected
//! automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .key_value_store(Arc::new(LocalStorageStore::new()?))
//!     .media_registry(Arc::new(BlobMediaRegistry::new()))
//!     .default_volume(0.5)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, KeyValueStore, MediaRegistry, SystemClock};
use std::fmt;
use std::sync::Arc;

/// Storage key the playlist collection lives under.
pub const DEFAULT_STORAGE_KEY: &str = "playlists";

/// Title given to playlists saved with a blank title.
pub const DEFAULT_PLAYLIST_TITLE: &str = "Untitled Playlist";

/// Output volume of a fresh playback session.
pub const DEFAULT_VOLUME: f64 = 0.7;

/// Core configuration for the disc core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Persistent store holding the serialized collection (required)
    pub key_value_store: Arc<dyn KeyValueStore>,

    /// Registry for uploaded audio and cover images (required)
    pub media_registry: Arc<dyn MediaRegistry>,

    /// Time source for `createdAt` / `addedAt`
    pub clock: Arc<dyn Clock>,

    /// Key under which the collection is stored
    pub storage_key: String,

    /// Title applied when a playlist is saved with a blank title
    pub untitled_playlist_title: String,

    /// Initial output volume in `0.0..=1.0`
    pub default_volume: f64,
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("storage_key", &self.storage_key)
            .field("untitled_playlist_title", &self.untitled_playlist_title)
            .field("default_volume", &self.default_volume)
            .finish_non_exhaustive()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Storage key is not blank
    /// - Untitled playlist title is not blank
    /// - Default volume is a finite value in `0.0..=1.0`
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(Error::Config("Storage key cannot be empty".to_string()));
        }

        if self.untitled_playlist_title.trim().is_empty() {
            return Err(Error::Config(
                "Untitled playlist title cannot be empty".to_string(),
            ));
        }

        if !self.default_volume.is_finite() || !(0.0..=1.0).contains(&self.default_volume) {
            return Err(Error::Config(format!(
                "Default volume must be between 0.0 and 1.0, got {}",
                self.default_volume
            )));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn key_value_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "KeyValueStore".to_string(),
        message: "KeyValueStore implementation is required to persist playlists. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default JsonFileStore. \
                 Web: inject bridge_wasm::LocalStorageStore."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn media_registry_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "MediaRegistry".to_string(),
        message: "MediaRegistry implementation is required for uploaded audio and covers. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default MemoryMediaRegistry. \
                 Web: inject bridge_wasm::BlobMediaRegistry."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_key_value_store() -> Result<Arc<dyn KeyValueStore>> {
    use bridge_desktop::JsonFileStore;

    let store = JsonFileStore::in_data_dir("disc");
    tracing::debug!(path = %store.path().display(), "Using default JSON file store");
    let store: Arc<dyn KeyValueStore> = Arc::new(store);
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_key_value_store() -> Result<Arc<dyn KeyValueStore>> {
    Err(key_value_store_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_media_registry() -> Result<Arc<dyn MediaRegistry>> {
    use bridge_desktop::MemoryMediaRegistry;

    let registry: Arc<dyn MediaRegistry> = Arc::new(MemoryMediaRegistry::new());
    Ok(registry)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_media_registry() -> Result<Arc<dyn MediaRegistry>> {
    Err(media_registry_missing_error())
}

/// Builder for constructing a [`CoreConfig`] instance.
#[derive(Default)]
pub struct CoreConfigBuilder {
    key_value_store: Option<Arc<dyn KeyValueStore>>,
    media_registry: Option<Arc<dyn MediaRegistry>>,
    clock: Option<Arc<dyn Clock>>,
    storage_key: Option<String>,
    untitled_playlist_title: Option<String>,
    default_volume: Option<f64>,
}

impl CoreConfigBuilder {
    /// Sets the store the collection is persisted in.
    pub fn key_value_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.key_value_store = Some(store);
        self
    }

    /// Sets the registry uploads are handed to.
    pub fn media_registry(mut self, registry: Arc<dyn MediaRegistry>) -> Self {
        self.media_registry = Some(registry);
        self
    }

    /// Sets the time source.
    ///
    /// Default: [`SystemClock`]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the storage key.
    ///
    /// Default: `"playlists"`
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Sets the title used for playlists saved without one.
    ///
    /// Default: `"Untitled Playlist"`
    pub fn untitled_playlist_title(mut self, title: impl Into<String>) -> Self {
        self.untitled_playlist_title = Some(title.into());
        self
    }

    /// Sets the initial output volume.
    ///
    /// Default: 0.7
    pub fn default_volume(mut self, volume: f64) -> Self {
        self.default_volume = Some(volume);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - A required bridge is missing and no default is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let key_value_store = match self.key_value_store {
            Some(store) => store,
            None => provide_default_key_value_store()?,
        };

        let media_registry = match self.media_registry {
            Some(registry) => registry,
            None => provide_default_media_registry()?,
        };

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        let config = CoreConfig {
            key_value_store,
            media_registry,
            clock,
            storage_key: self
                .storage_key
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            untitled_playlist_title: self
                .untitled_playlist_title
                .unwrap_or_else(|| DEFAULT_PLAYLIST_TITLE.to_string()),
            default_volume: self.default_volume.unwrap_or(DEFAULT_VOLUME),
        };

        config.validate()?;

        Ok(config)
    }
}
