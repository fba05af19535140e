//! WebAssembly bindings for the disc service
//!
//! Exposes [`DiscService`] to JavaScript backed by `localStorage`, object
//! URLs and an `HTMLAudioElement`. Ids cross the boundary as strings and
//! values as plain objects (`serde-wasm-bindgen`). Failures are thrown as
//! `Error`s whose `name` identifies the kind (`NotFoundError`,
//! `QuotaExceededError`, `SourceUnavailableError`, ...).
//!
//! ```javascript
//! import init, { JsDiscService, JsUpload, initLogging, formatTime } from './disc.js';
//!
//! await init();
//! initLogging('core_service=debug');
//!
//! const disc = new JsDiscService();
//! disc.onChange(() => render(disc.playlists(), disc.playback()));
//!
//! const playlist = disc.createPlaylist('Road Trip', null);
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! disc.addTrack(playlist.id, new JsUpload(file.name, bytes, file.type));
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use bridge_traits::{AudioEvent, MediaUpload};
use bridge_wasm::{BlobMediaRegistry, HtmlAudioOutput, LocalStorageStore};
use core_library::{LibraryError, PlaylistId, TrackId};
use core_runtime::logging::{init_logging, LoggingConfig};
use core_runtime::CoreConfig;
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::error::{Result, ServiceError};
use crate::service::DiscService;

// =============================================================================
// Error Handling
// =============================================================================

fn to_js_error(err: ServiceError) -> JsValue {
    let error = js_sys::Error::new(&err.to_string());
    error.set_name(err.kind());
    error.into()
}

fn to_js_value<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn parse_playlist_id(id: &str) -> Result<PlaylistId> {
    PlaylistId::from_string(id).map_err(|e| invalid_id("playlistId", e.to_string()))
}

fn parse_track_id(id: &str) -> Result<TrackId> {
    TrackId::from_string(id).map_err(|e| invalid_id("trackId", e.to_string()))
}

fn invalid_id(field: &str, message: String) -> ServiceError {
    LibraryError::InvalidInput {
        field: field.to_string(),
        message,
    }
    .into()
}

// =============================================================================
// Uploads
// =============================================================================

/// A file chosen by the user: name, raw bytes and optional MIME type.
#[wasm_bindgen]
pub struct JsUpload {
    file_name: String,
    data: Vec<u8>,
    mime_type: Option<String>,
}

#[wasm_bindgen]
impl JsUpload {
    #[wasm_bindgen(constructor)]
    pub fn new(file_name: String, data: Vec<u8>, mime_type: Option<String>) -> JsUpload {
        Self {
            file_name,
            data,
            mime_type: mime_type.filter(|mime| !mime.is_empty()),
        }
    }
}

impl From<JsUpload> for MediaUpload {
    fn from(upload: JsUpload) -> Self {
        let media = MediaUpload::new(upload.file_name, upload.data);
        match upload.mime_type {
            Some(mime_type) => media.with_mime_type(mime_type),
            None => media,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

struct Inner {
    service: DiscService,
    on_change: Option<js_sys::Function>,
}

/// JavaScript handle to the playlist collection and player.
#[wasm_bindgen]
pub struct JsDiscService {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl JsDiscService {
    /// Open the collection stored under `storageKey` (default `"playlists"`).
    #[wasm_bindgen(constructor)]
    pub fn new(storage_key: Option<String>) -> std::result::Result<JsDiscService, JsValue> {
        Self::bootstrap(storage_key).map_err(to_js_error)
    }

    /// Register a callback invoked after every audio element event.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Option<js_sys::Function>) {
        self.inner.borrow_mut().on_change = callback;
    }

    /// Re-read the collection from storage.
    pub fn reload(&self) {
        self.inner.borrow_mut().service.reload();
    }

    pub fn playlists(&self) -> std::result::Result<JsValue, JsValue> {
        to_js_value(&self.inner.borrow().service.playlists())
    }

    /// The playlist with `id`, or `undefined`.
    pub fn playlist(&self, id: &str) -> std::result::Result<JsValue, JsValue> {
        let id = parse_playlist_id(id).map_err(to_js_error)?;
        match self.inner.borrow().service.playlist(id) {
            Some(playlist) => to_js_value(playlist),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn playback(&self) -> std::result::Result<JsValue, JsValue> {
        to_js_value(&self.inner.borrow().service.playback())
    }

    #[wasm_bindgen(js_name = createPlaylist)]
    pub fn create_playlist(
        &self,
        title: &str,
        cover: Option<JsUpload>,
    ) -> std::result::Result<JsValue, JsValue> {
        self.run(|service| service.create_playlist(title, cover.map(Into::into)))
    }

    #[wasm_bindgen(js_name = renamePlaylist)]
    pub fn rename_playlist(&self, id: &str, title: &str) -> std::result::Result<JsValue, JsValue> {
        self.run(|service| service.rename_playlist(parse_playlist_id(id)?, title))
    }

    /// Replace the cover image; pass `null` to clear it.
    #[wasm_bindgen(js_name = setCover)]
    pub fn set_cover(
        &self,
        id: &str,
        cover: Option<JsUpload>,
    ) -> std::result::Result<JsValue, JsValue> {
        self.run(|service| service.set_cover(parse_playlist_id(id)?, cover.map(Into::into)))
    }

    #[wasm_bindgen(js_name = deletePlaylist)]
    pub fn delete_playlist(&self, id: &str) -> std::result::Result<JsValue, JsValue> {
        self.run(|service| service.delete_playlist(parse_playlist_id(id)?))
    }

    #[wasm_bindgen(js_name = addTrack)]
    pub fn add_track(
        &self,
        playlist_id: &str,
        upload: JsUpload,
    ) -> std::result::Result<JsValue, JsValue> {
        self.run(|service| service.add_track(parse_playlist_id(playlist_id)?, upload.into()))
    }

    #[wasm_bindgen(js_name = renameTrack)]
    pub fn rename_track(
        &self,
        playlist_id: &str,
        track_id: &str,
        title: &str,
    ) -> std::result::Result<JsValue, JsValue> {
        self.run(|service| {
            service.rename_track(parse_playlist_id(playlist_id)?, parse_track_id(track_id)?, title)
        })
    }

    #[wasm_bindgen(js_name = deleteTrack)]
    pub fn delete_track(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> std::result::Result<JsValue, JsValue> {
        self.run(|service| {
            service.delete_track(parse_playlist_id(playlist_id)?, parse_track_id(track_id)?)
        })
    }

    /// Row click: toggles the current track, starts any other.
    #[wasm_bindgen(js_name = playTrack)]
    pub fn play_track(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> std::result::Result<JsValue, JsValue> {
        self.run(|service| {
            service.play_track(parse_playlist_id(playlist_id)?, parse_track_id(track_id)?)
        })
    }

    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> std::result::Result<JsValue, JsValue> {
        self.run(|service| {
            service.select_track(parse_playlist_id(playlist_id)?, parse_track_id(track_id)?)
        })
    }

    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) -> std::result::Result<JsValue, JsValue> {
        self.run(DiscService::toggle_play_pause)
    }

    pub fn stop(&self) -> std::result::Result<JsValue, JsValue> {
        self.run(|service| Ok(service.stop()))
    }

    /// Returns the position actually requested.
    pub fn seek(&self, seconds: f64) -> std::result::Result<f64, JsValue> {
        self.inner
            .borrow_mut()
            .service
            .seek(seconds)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) -> std::result::Result<f64, JsValue> {
        self.inner
            .borrow_mut()
            .service
            .set_volume(volume)
            .map_err(to_js_error)
    }

    /// Returns whether the player is muted afterwards.
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) -> std::result::Result<bool, JsValue> {
        self.inner
            .borrow_mut()
            .service
            .toggle_mute()
            .map_err(to_js_error)
    }
}

impl JsDiscService {
    fn bootstrap(storage_key: Option<String>) -> Result<Self> {
        let output = HtmlAudioOutput::new()?;

        let mut builder = CoreConfig::builder()
            .key_value_store(Arc::new(LocalStorageStore::new()?))
            .media_registry(Arc::new(BlobMediaRegistry::new()));
        if let Some(key) = storage_key {
            builder = builder.storage_key(key);
        }
        let config = builder.build()?;

        let inner = Rc::new(RefCell::new(Inner {
            service: DiscService::new(config, Box::new(output.clone())),
            on_change: None,
        }));

        let weak = Rc::downgrade(&inner);
        output.on_event(move |event| dispatch_audio_event(&weak, event))?;

        Ok(Self { inner })
    }

    fn run<T: Serialize>(
        &self,
        operation: impl FnOnce(&mut DiscService) -> Result<T>,
    ) -> std::result::Result<JsValue, JsValue> {
        let value = operation(&mut self.inner.borrow_mut().service).map_err(to_js_error)?;
        to_js_value(&value)
    }
}

fn dispatch_audio_event(inner: &Weak<RefCell<Inner>>, event: AudioEvent) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    let callback = {
        let Ok(mut guard) = inner.try_borrow_mut() else {
            warn!(?event, "Audio event dropped while the service was busy");
            return;
        };
        if let Err(e) = guard.service.handle_audio_event(event) {
            warn!(error = %e, ?event, "Audio event could not be applied");
        }
        guard.on_change.clone()
    };

    if let Some(callback) = callback {
        if let Err(err) = callback.call0(&JsValue::NULL) {
            warn!(?err, "onChange callback threw");
        }
    }
}

// =============================================================================
// Free functions
// =============================================================================

/// Route `tracing` output to the browser console.
///
/// `filter` uses `RUST_LOG` syntax, e.g. `"core_service=debug"`.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging_js(filter: Option<String>) -> std::result::Result<(), JsValue> {
    let mut config = LoggingConfig::default();
    if let Some(filter) = filter {
        config = config.with_filter(filter);
    }
    init_logging(config).map_err(|e| to_js_error(e.into()))
}

/// Format seconds as `m:ss`.
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time_js(seconds: f64) -> String {
    crate::format_time(seconds)
}
