//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux) and headless test hosts.
//!
//! ## Overview
//!
//! - `KeyValueStore` using a JSON file in the platform data directory
//!   ([`JsonFileStore`]) or an in-memory map ([`MemoryKeyValueStore`])
//! - `MediaRegistry` using an in-memory table of uploaded bytes
//!   ([`MemoryMediaRegistry`])
//! - `AudioOutput` that records commands without producing sound
//!   ([`SilentAudioOutput`])
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{JsonFileStore, MemoryMediaRegistry};
//! use std::sync::Arc;
//!
//! let store = Arc::new(JsonFileStore::in_data_dir("disc"));
//! let media = Arc::new(MemoryMediaRegistry::new());
//! // Use in core configuration
//! ```

mod audio;
mod file_store;
mod memory;

pub use audio::{SilentAudioOutput, SilentElementState};
pub use file_store::JsonFileStore;
pub use memory::{MemoryKeyValueStore, MemoryMediaRegistry};
