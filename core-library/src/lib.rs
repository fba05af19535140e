//! # Library Management Module
//!
//! Owns the persisted playlist collection.
//!
//! ## Overview
//!
//! This module manages:
//! - Domain models for playlists and tracks ([`models`])
//! - The Storage Gateway that reads and writes the whole collection under one key
//! - Mutation Operations performing load → change → save for every edit
//! - The in-memory Playlist Repository the view layer renders from
//!
//! ## Example
//!
//! ```ignore
//! use core_library::{PlaylistMutations, PlaylistRepository};
//!
//! let mutations = PlaylistMutations::from_config(&config);
//! let mut repository = PlaylistRepository::new();
//! repository.refresh(mutations.gateway());
//!
//! let playlist = mutations.create_playlist("Road Trip", None)?;
//! repository.apply(&playlist);
//! ```

pub mod error;
pub mod gateway;
pub mod models;
pub mod mutations;
pub mod repository;

pub use error::{LibraryError, Result};
pub use gateway::StorageGateway;
pub use models::{Playlist, PlaylistId, Track, TrackId};
pub use mutations::{EntityKind, Mutation, PlaylistMutations, TrackRemoval};
pub use repository::PlaylistRepository;
