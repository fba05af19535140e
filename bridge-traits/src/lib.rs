//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and platform-specific
//! implementations. Each trait represents a capability that the core requires but
//! that must be implemented differently per platform (desktop, web).
//!
//! ## Traits
//!
//! - [`KeyValueStore`](storage::KeyValueStore) - Persistent string storage (localStorage, JSON file)
//! - [`MediaRegistry`](media::MediaRegistry) - Session-scoped handles for uploaded audio and images
//! - [`AudioOutput`](playback::AudioOutput) - Native audio element control
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Storage + media |
//! | Web      | `bridge-wasm`       | ✅ Storage + media + audio |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Report a full store as `BridgeError::QuotaExceeded`
//! - Include error context (key names, DOM exception names)
//!
//! ## Thread Safety
//!
//! On native targets every bridge trait requires `Send + Sync` through
//! [`PlatformSendSync`](platform::PlatformSendSync). On `wasm32` the bound
//! disappears because browser handles live on a single thread.

pub mod error;
pub mod media;
pub mod platform;
pub mod playback;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use media::{MediaKind, MediaRef, MediaRegistry, MediaUpload};
pub use playback::{AudioEvent, AudioOutput};
pub use storage::KeyValueStore;
pub use time::{Clock, FixedClock, SystemClock};
