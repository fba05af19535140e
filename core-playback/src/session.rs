//! # Playback Session
//!
//! Finite-state machine over which track is current and whether it should be
//! playing.
//!
//! ```text
//!            select_track              toggle_play_pause
//!   Idle ───────────────────▶ Playing ◀───────────────────▶ Paused
//!    ▲                          │  ▲                          │
//!    │ stop / track_deleted     │  └── track_ended (next) ────┤
//!    └──────────────────────────┴── track_ended (last) ──▶ Paused
//! ```
//!
//! Every command is forwarded to the host [`AudioOutput`] first. Session
//! state only changes after the element accepted the command. Loading a new
//! track is the one multi-step command: if the element takes the new source
//! but then refuses to start, it is pointed back at the previous track and
//! the session pauses there, so session and element never disagree.

use std::sync::Arc;

use bridge_traits::{AudioEvent, AudioOutput, MediaRef, MediaRegistry};
use core_library::{PlaylistId, Track, TrackId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{PlaybackError, Result};
use crate::transport::{clamp_volume, Transport};

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    /// No track selected.
    Idle,
    /// A track is selected and the element is paused.
    Paused,
    /// A track is selected and the element is playing.
    Playing,
}

/// What a session command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Transition {
    /// A track was loaded and started from the beginning.
    Started,
    /// The current track was paused.
    Paused,
    /// The current track resumed from its position.
    Resumed,
    /// The current track ended and the next one started.
    Advanced,
    /// The last track ended; it stays selected, paused at its end.
    Finished,
    /// Selection was cleared.
    Stopped,
    /// Nothing changed.
    Unchanged,
}

/// The selected track and the playlist it was selected from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub playlist_id: PlaylistId,
    pub track: Track,
}

/// Serializable view of the session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub now_playing: Option<NowPlaying>,
    pub transport: Transport,
}

pub struct PlaybackSession {
    output: Box<dyn AudioOutput>,
    media: Option<Arc<dyn MediaRegistry>>,
    now_playing: Option<NowPlaying>,
    playing: bool,
    transport: Transport,
}

impl PlaybackSession {
    pub fn new(output: Box<dyn AudioOutput>, volume: f64) -> Self {
        Self {
            output,
            media: None,
            now_playing: None,
            playing: false,
            transport: Transport::new(volume),
        }
    }

    /// Check media references against `registry` before loading them.
    pub fn with_media_registry(mut self, registry: Arc<dyn MediaRegistry>) -> Self {
        self.media = Some(registry);
        self
    }

    pub fn state(&self) -> PlaybackState {
        match (&self.now_playing, self.playing) {
            (None, _) => PlaybackState::Idle,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        }
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    pub fn current_track_id(&self) -> Option<TrackId> {
        self.now_playing.as_ref().map(|now| now.track.id)
    }

    pub fn current_playlist_id(&self) -> Option<PlaylistId> {
        self.now_playing.as_ref().map(|now| now.playlist_id)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state(),
            now_playing: self.now_playing.clone(),
            transport: self.transport.clone(),
        }
    }

    /// Load `track` and start it from the beginning.
    ///
    /// Selecting the track that is already current restarts it.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::SourceUnavailable`] if the track's media reference
    ///   no longer resolves; nothing is sent to the element
    /// - [`PlaybackError::Output`] if the element rejected a command; the
    ///   previously current track stays selected, paused
    pub fn select_track(&mut self, playlist_id: PlaylistId, track: &Track) -> Result<Transition> {
        self.ensure_available(&track.source)?;

        self.output.set_source(&track.source)?;
        if let Err(e) = self.start_loaded_source() {
            self.restore_current_source();
            return Err(e);
        }

        self.now_playing = Some(NowPlaying {
            playlist_id,
            track: track.clone(),
        });
        self.playing = true;
        self.transport.reset_for_track(track.duration_seconds);

        debug!(%playlist_id, track_id = %track.id, "Playback started");
        Ok(Transition::Started)
    }

    /// Pause if playing, resume if paused.
    pub fn toggle_play_pause(&mut self) -> Result<Transition> {
        if self.now_playing.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        if self.playing {
            self.output.pause()?;
            self.playing = false;
            debug!("Playback paused");
            Ok(Transition::Paused)
        } else {
            self.output.play()?;
            self.playing = true;
            debug!("Playback resumed");
            Ok(Transition::Resumed)
        }
    }

    /// Row-click behavior: the current track toggles, any other track is
    /// selected and starts.
    pub fn activate_track(&mut self, playlist_id: PlaylistId, track: &Track) -> Result<Transition> {
        if self.current_track_id() == Some(track.id) {
            self.toggle_play_pause()
        } else {
            self.select_track(playlist_id, track)
        }
    }

    /// Advance after the element reported the end of the current source.
    ///
    /// `tracks` is the owning playlist's sequence as it is now; the next
    /// track is whichever one directly follows the current track in it. When
    /// there is none (last track, or the current track is no longer in the
    /// sequence) the session stays on the ended track, paused.
    ///
    /// If the next track cannot be started, the error is returned and the
    /// session (and the element) are left paused at the end of the track that
    /// finished.
    pub fn track_ended(&mut self, tracks: &[Track]) -> Result<Transition> {
        let Some(now) = self.now_playing.as_ref() else {
            return Ok(Transition::Unchanged);
        };
        let playlist_id = now.playlist_id;
        let next = tracks
            .iter()
            .position(|track| track.id == now.track.id)
            .and_then(|index| tracks.get(index + 1))
            .cloned();

        self.playing = false;
        self.transport.set_position(self.transport.duration());

        match next {
            Some(next) => {
                self.select_track(playlist_id, &next)?;
                debug!(track_id = %next.id, "Advanced to next track");
                Ok(Transition::Advanced)
            }
            None => {
                debug!("Reached end of playlist");
                Ok(Transition::Finished)
            }
        }
    }

    /// Clear the session if `track_id` is the current track.
    pub fn track_deleted(&mut self, track_id: TrackId) -> Transition {
        if self.current_track_id() == Some(track_id) {
            self.stop()
        } else {
            Transition::Unchanged
        }
    }

    /// Pause the element and clear the selection.
    ///
    /// Always ends `Idle`; a failing pause is logged, not returned.
    pub fn stop(&mut self) -> Transition {
        if self.now_playing.is_none() {
            return Transition::Unchanged;
        }

        if self.playing {
            if let Err(e) = self.output.pause() {
                warn!(error = %e, "Failed to pause audio output while stopping");
            }
        }

        self.now_playing = None;
        self.playing = false;
        self.transport.reset_for_track(0.0);
        debug!("Playback stopped");
        Transition::Stopped
    }

    /// Refresh the displayed copy of the current track after an edit.
    ///
    /// Returns `true` if `track` is the current track.
    pub fn track_updated(&mut self, track: &Track) -> bool {
        match self.now_playing.as_mut() {
            Some(now) if now.track.id == track.id => {
                now.track = track.clone();
                true
            }
            _ => false,
        }
    }

    /// Jump to `seconds`, clamped to the playable range.
    ///
    /// Returns the position actually requested from the element.
    pub fn seek(&mut self, seconds: f64) -> Result<f64> {
        if self.now_playing.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        let target = self.transport.clamp_seek(seconds);
        self.output.set_current_time(target)?;
        self.transport.set_position(target);
        Ok(target)
    }

    /// Set the output volume, clamped to `0.0..=1.0`. Zero mutes.
    pub fn set_volume(&mut self, volume: f64) -> Result<f64> {
        if volume.is_nan() {
            return Err(PlaybackError::InvalidVolume(volume));
        }

        let volume = clamp_volume(volume);
        self.output.set_volume(volume)?;
        self.transport.set_volume(volume);
        Ok(volume)
    }

    /// Mute, or restore the previous volume (the default when that was 0).
    ///
    /// Returns whether the session is muted afterwards.
    pub fn toggle_mute(&mut self) -> Result<bool> {
        if self.transport.is_muted() {
            let restored = self.transport.unmute_volume();
            self.output.set_volume(restored)?;
            self.transport.unmute_to(restored);
        } else {
            self.output.set_volume(0.0)?;
            self.transport.mute();
        }
        Ok(self.transport.is_muted())
    }

    /// Apply an event reported by the audio element.
    ///
    /// `tracks` is the owning playlist's current sequence, used for
    /// [`AudioEvent::Ended`].
    pub fn handle_event(&mut self, event: AudioEvent, tracks: &[Track]) -> Result<Transition> {
        match event {
            AudioEvent::TimeUpdate(seconds) => {
                self.transport.set_position(seconds);
                Ok(Transition::Unchanged)
            }
            AudioEvent::DurationChange(seconds) => {
                self.transport.set_duration(seconds);
                if let Some(now) = self.now_playing.as_mut() {
                    now.track.duration_seconds = self.transport.duration();
                }
                Ok(Transition::Unchanged)
            }
            AudioEvent::Ended => self.track_ended(tracks),
        }
    }

    fn start_loaded_source(&self) -> Result<()> {
        self.output.set_volume(self.transport.effective_volume())?;
        self.output.play()?;
        Ok(())
    }

    /// Point the element back at the current track after a failed load.
    ///
    /// A fresh source leaves the element paused, so the session pauses too.
    /// If even that fails the selection is dropped.
    fn restore_current_source(&mut self) {
        let Some(now) = self.now_playing.as_ref() else {
            return;
        };
        let position = self.transport.position();

        let restored = self
            .output
            .set_source(&now.track.source)
            .and_then(|()| self.output.set_current_time(position));

        match restored {
            Ok(()) => {
                self.playing = false;
                warn!(
                    track_id = %now.track.id,
                    position,
                    "Load failed, previous track restored paused"
                );
            }
            Err(e) => {
                warn!(error = %e, "Load failed and previous track could not be restored");
                self.now_playing = None;
                self.playing = false;
                self.transport.reset_for_track(0.0);
            }
        }
    }

    fn ensure_available(&self, source: &MediaRef) -> Result<()> {
        match &self.media {
            Some(registry) if !registry.is_available(source) => {
                warn!(source = %source, "Media reference is no longer available");
                Err(PlaybackError::SourceUnavailable(source.to_string()))
            }
            _ => Ok(()),
        }
    }
}
