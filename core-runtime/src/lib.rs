//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the library, playback and
//! service crates:
//! - Configuration management ([`CoreConfig`](config::CoreConfig))
//! - Logging and tracing bootstrap
//!
//! ## Overview
//!
//! Hosts assemble a [`CoreConfig`](config::CoreConfig) from their bridge
//! implementations once at startup. The builder fails fast with
//! [`Error::CapabilityMissing`] when a required bridge is absent, so a
//! misconfigured host is caught before any playlist is read.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{Error, Result};
