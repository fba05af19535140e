//! Core service façade and bootstrap helpers.
//!
//! [`DiscService`] composes the persisted collection (`core-library`) with
//! the playback session (`core-playback`) behind one object a view layer can
//! drive. Native hosts typically enable the `desktop-shims` feature, which
//! lets [`CoreConfig`] fall back to the `bridge-desktop` adapters, whereas
//! WebAssembly builds enable the `wasm` feature and get [`wasm::JsDiscService`]
//! wired to `localStorage`, object URLs and an `HTMLAudioElement`.

pub mod error;
pub mod service;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

pub use error::{Result, ServiceError};
pub use service::DiscService;

pub use bridge_traits::{AudioEvent, MediaUpload};
pub use core_library::{Playlist, PlaylistId, Track, TrackId};
pub use core_playback::{format_time, PlaybackSnapshot, PlaybackState, Transition};
pub use core_runtime::CoreConfig;

/// Convenience bootstrapper for native hosts.
///
/// Uses the default configuration, which stores the collection in the
/// platform data directory and keeps uploads in memory.
///
/// ```ignore
/// use bridge_desktop::SilentAudioOutput;
///
/// let mut service = core_service::bootstrap_desktop(Box::new(SilentAudioOutput::new()))?;
/// let playlist = service.create_playlist("Road Trip", None)?;
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(output: Box<dyn bridge_traits::AudioOutput>) -> Result<DiscService> {
    let config = CoreConfig::builder().build()?;
    Ok(DiscService::new(config, output))
}
