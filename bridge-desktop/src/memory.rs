//! In-memory bridge implementations.
//!
//! Used by tests and by headless hosts that do not need persistence across
//! process restarts.

use bridge_traits::{
    error::{BridgeError, Result},
    media::{MediaKind, MediaRef, MediaRegistry, MediaUpload},
    storage::KeyValueStore,
};
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Key-value store backed by a `HashMap`.
///
/// An optional quota caps the total number of bytes held across all keys and
/// values, mirroring the capacity limit browsers apply to `localStorage`.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once `quota_bytes` would be exceeded.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes currently held (keys plus values).
    pub fn used_bytes(&self) -> usize {
        self.entries
            .lock()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();

        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, value)| existing.len() + value.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(BridgeError::QuotaExceeded(format!(
                    "writing '{key}' needs {needed} bytes, quota is {quota}"
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

const MEDIA_SCHEME: &str = "mem";

/// Media registry holding uploaded bytes for the lifetime of the process.
///
/// References look like `mem:audio/<uuid>`; anything not registered by this
/// instance (including references persisted by an earlier run) is reported as
/// unavailable.
#[derive(Debug, Default)]
pub struct MemoryMediaRegistry {
    entries: Mutex<HashMap<MediaRef, Bytes>>,
}

impl MemoryMediaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the content registered under `media`.
    pub fn content(&self, media: &MediaRef) -> Option<Bytes> {
        self.entries.lock().get(media).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl MediaRegistry for MemoryMediaRegistry {
    fn register(&self, kind: MediaKind, upload: &MediaUpload) -> Result<MediaRef> {
        let segment = match kind {
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        };
        let media = MediaRef::new(format!("{MEDIA_SCHEME}:{segment}/{}", Uuid::new_v4()));

        self.entries.lock().insert(media.clone(), upload.data.clone());
        debug!(
            media = %media,
            file = %upload.file_name,
            size = upload.data.len(),
            "Registered media"
        );

        Ok(media)
    }

    fn is_available(&self, media: &MediaRef) -> bool {
        self.entries.lock().contains_key(media)
    }

    fn release(&self, media: &MediaRef) -> Result<()> {
        if self.entries.lock().remove(media).is_some() {
            debug!(media = %media, "Released media");
        }
        Ok(())
    }
}
