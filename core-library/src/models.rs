//! Domain models for the playlist collection
//!
//! Field names serialize in camelCase so a collection written by the browser
//! app (`{id, title, url, duration, addedAt}` tracks inside
//! `{id, title, coverUrl, tracks, createdAt}` playlists) loads unchanged.

use bridge_traits::MediaRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Types
// =============================================================================

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TrackId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Unique identifier for a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(pub Uuid);

impl PlaylistId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PlaylistId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlaylistId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

// =============================================================================
// Track
// =============================================================================

/// An uploaded audio file inside a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique identifier, immutable
    pub id: TrackId,
    /// Display title
    pub title: String,
    /// Session-scoped handle to the audio content
    #[serde(rename = "url")]
    pub source: MediaRef,
    /// Length in seconds; 0 until the audio element reports it
    #[serde(rename = "duration", default)]
    pub duration_seconds: f64,
    /// Creation timestamp, immutable
    pub added_at: DateTime<Utc>,
}

impl Track {
    /// Create a track for an uploaded file, titled after the file name.
    pub fn from_upload(file_name: &str, source: MediaRef, added_at: DateTime<Utc>) -> Self {
        Self {
            id: TrackId::new(),
            title: default_track_title(file_name),
            source,
            duration_seconds: 0.0,
            added_at,
        }
    }
}

// =============================================================================
// Playlist
// =============================================================================

/// Playlist with its ordered tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique identifier, immutable
    pub id: PlaylistId,
    /// Display title
    pub title: String,
    /// Optional session-scoped handle to the cover image
    #[serde(rename = "coverUrl", default)]
    pub cover: Option<MediaRef>,
    /// Tracks in display order
    #[serde(default)]
    pub tracks: Vec<Track>,
    /// Creation timestamp, immutable
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Create an empty playlist.
    ///
    /// `title` is stored as given; blank-title defaulting happens in the
    /// mutation layer where the configured default is known.
    pub fn new(
        title: impl Into<String>,
        cover: Option<MediaRef>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PlaylistId::new(),
            title: title.into(),
            cover,
            tracks: Vec::new(),
            created_at,
        }
    }

    /// Position of a track in the display order
    pub fn track_position(&self, track_id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|track| track.id == track_id)
    }

    pub fn track(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == track_id)
    }

    pub fn track_mut(&mut self, track_id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|track| track.id == track_id)
    }

    /// Sum of the known track durations, in seconds
    pub fn total_duration_seconds(&self) -> f64 {
        self.tracks.iter().map(|track| track.duration_seconds).sum()
    }
}

// =============================================================================
// Title rules
// =============================================================================

/// A title is blank when nothing is left after trimming whitespace.
pub fn is_blank(title: &str) -> bool {
    title.trim().is_empty()
}

/// Return `title`, or `fallback` when `title` is blank.
pub fn title_or_default(title: &str, fallback: &str) -> String {
    if is_blank(title) {
        fallback.to_string()
    } else {
        title.to_string()
    }
}

/// Default track title for an uploaded file: the file name minus its final
/// extension.
///
/// Only a trailing `.ext` whose extension contains no `.` or `/` is removed,
/// so `"a.tar.gz"` becomes `"a.tar"` and `"name."` is kept as is. A name that
/// would be left empty (`".hidden"`) is returned whole.
pub fn default_track_title(file_name: &str) -> String {
    let stripped = match file_name.rfind('.') {
        Some(dot) => {
            let extension = &file_name[dot + 1..];
            if extension.is_empty() || extension.contains('/') {
                file_name
            } else {
                &file_name[..dot]
            }
        }
        None => file_name,
    };

    if stripped.is_empty() {
        file_name.to_string()
    } else {
        stripped.to_string()
    }
}
