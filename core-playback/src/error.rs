//! # Playback Error Types
//!
//! Errors that can occur while driving the audio element.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The track's media reference no longer resolves in this session,
    /// typically because it was persisted before a reload.
    #[error("Audio source unavailable: {0}")]
    SourceUnavailable(String),

    /// Attempted operation when no track is loaded.
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Volume was not a number.
    #[error("Invalid volume: {0} (must be between 0.0 and 1.0)")]
    InvalidVolume(f64),

    /// The audio element rejected a command.
    #[error("Audio output error: {0}")]
    Output(#[from] BridgeError),
}

impl PlaybackError {
    /// Returns `true` for failures the user can fix by re-uploading the file.
    pub fn is_stale_source(&self) -> bool {
        matches!(self, PlaybackError::SourceUnavailable(_))
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
