//! WebAssembly Bridge Implementations
//!
//! Browser-backed implementations of the bridge traits defined in
//! `bridge-traits`, built on `web-sys` and `wasm-bindgen`.
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! It will not compile for native targets.
//!
//! # Implementations
//!
//! - [`LocalStorageStore`]: `KeyValueStore` over `window.localStorage`
//! - [`BlobMediaRegistry`]: object URLs created from uploaded bytes, revoked
//!   on release
//! - [`HtmlAudioOutput`]: `AudioOutput` driving an `HTMLAudioElement` and
//!   forwarding its events
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::{BlobMediaRegistry, HtmlAudioOutput, LocalStorageStore};
//!
//! let store = LocalStorageStore::new()?;
//! let registry = BlobMediaRegistry::new();
//! let output = HtmlAudioOutput::new()?;
//! output.on_event(|event| tracing::debug!(?event, "audio event"))?;
//! ```

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]

pub mod audio;
pub mod error;
pub mod media;
pub mod storage;

pub use audio::HtmlAudioOutput;
pub use error::js_error;
pub use media::BlobMediaRegistry;
pub use storage::LocalStorageStore;
