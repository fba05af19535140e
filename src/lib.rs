//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-service`, `core-library`, `core-playback`). Host
//! shells can depend on `disc-workspace` and enable `desktop-shims` or `wasm`
//! without wiring each crate individually.

#[cfg(any(feature = "desktop-shims", feature = "wasm"))]
pub use core_service;

#[cfg(feature = "library-only")]
pub use core_library;

#[cfg(feature = "library-only")]
pub use core_playback;
