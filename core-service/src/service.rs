//! The `DiscService` façade.
//!
//! Owns everything a page needs: the mutation operations over the persisted
//! collection, the in-memory repository the view renders from, the playback
//! session and the media registry uploads are registered with.

use std::sync::Arc;

use bridge_traits::{AudioEvent, AudioOutput, MediaKind, MediaRef, MediaRegistry, MediaUpload};
use core_library::{
    EntityKind, LibraryError, Mutation, Playlist, PlaylistId, PlaylistMutations,
    PlaylistRepository, Track, TrackId,
};
use core_playback::{PlaybackSession, PlaybackSnapshot, Transition};
use core_runtime::CoreConfig;
use tracing::{debug, info, warn};

use crate::error::Result;

pub struct DiscService {
    mutations: PlaylistMutations,
    repository: PlaylistRepository,
    session: PlaybackSession,
    media: Arc<dyn MediaRegistry>,
}

impl DiscService {
    /// Compose a service from validated configuration and the host's audio
    /// element, then load the stored collection.
    pub fn new(config: CoreConfig, output: Box<dyn AudioOutput>) -> Self {
        let mutations = PlaylistMutations::from_config(&config);
        let mut repository = PlaylistRepository::new();
        repository.refresh(mutations.gateway());

        let session = PlaybackSession::new(output, config.default_volume)
            .with_media_registry(config.media_registry.clone());

        info!(
            storage_key = mutations.gateway().key(),
            playlists = repository.len(),
            "Disc service ready"
        );

        Self {
            mutations,
            repository,
            session,
            media: config.media_registry,
        }
    }

    // ----- Collection -----

    pub fn playlists(&self) -> &[Playlist] {
        self.repository.all()
    }

    pub fn playlist(&self, id: PlaylistId) -> Option<&Playlist> {
        self.repository.get(id)
    }

    /// Playlist owning the current track, if any.
    pub fn current_playlist(&self) -> Option<&Playlist> {
        self.session
            .current_playlist_id()
            .and_then(|id| self.repository.get(id))
    }

    /// Re-read the collection from storage.
    pub fn reload(&mut self) {
        self.repository.refresh(self.mutations.gateway());
    }

    /// Create a playlist, registering `cover` first if one was uploaded.
    pub fn create_playlist(&mut self, title: &str, cover: Option<MediaUpload>) -> Result<Playlist> {
        let cover = cover
            .map(|upload| self.media.register(MediaKind::Image, &upload))
            .transpose()?;

        match self.mutations.create_playlist(title, cover.clone()) {
            Ok(playlist) => {
                self.repository.apply(&playlist);
                Ok(playlist)
            }
            Err(e) => {
                if let Some(cover) = cover {
                    self.release_quietly(&cover);
                }
                Err(e.into())
            }
        }
    }

    pub fn rename_playlist(&mut self, id: PlaylistId, title: &str) -> Result<Playlist> {
        let playlist = self.mutations.rename_playlist(id, title)?.into_result()?;
        self.repository.apply(&playlist);
        Ok(playlist)
    }

    /// Replace or clear a playlist's cover. The previous cover is released
    /// once the change is stored.
    pub fn set_cover(&mut self, id: PlaylistId, cover: Option<MediaUpload>) -> Result<Playlist> {
        let previous = self.repository.get(id).and_then(|p| p.cover.clone());
        let cover = cover
            .map(|upload| self.media.register(MediaKind::Image, &upload))
            .transpose()?;

        let stored = self
            .mutations
            .set_cover(id, cover.clone())
            .and_then(Mutation::into_result);

        match stored {
            Ok(playlist) => {
                if let Some(previous) =
                    previous.filter(|previous| Some(previous) != cover.as_ref())
                {
                    self.release_quietly(&previous);
                }
                self.repository.apply(&playlist);
                Ok(playlist)
            }
            Err(e) => {
                if let Some(cover) = cover {
                    self.release_quietly(&cover);
                }
                Err(e.into())
            }
        }
    }

    /// Register an uploaded audio file and append it to a playlist.
    pub fn add_track(&mut self, playlist_id: PlaylistId, upload: MediaUpload) -> Result<Playlist> {
        let source = self.media.register(MediaKind::Audio, &upload)?;

        let stored = self
            .mutations
            .add_track(playlist_id, &upload.file_name, source.clone())
            .and_then(Mutation::into_result);

        match stored {
            Ok(playlist) => {
                self.repository.apply(&playlist);
                Ok(playlist)
            }
            Err(e) => {
                self.release_quietly(&source);
                Err(e.into())
            }
        }
    }

    /// Rename a track; a blank title keeps the old one. The now-playing
    /// display follows the new title.
    pub fn rename_track(
        &mut self,
        playlist_id: PlaylistId,
        track_id: TrackId,
        title: &str,
    ) -> Result<Playlist> {
        let playlist = self
            .mutations
            .rename_track(playlist_id, track_id, title)?
            .into_result()?;

        if let Some(track) = playlist.track(track_id) {
            self.session.track_updated(track);
        }
        self.repository.apply(&playlist);
        Ok(playlist)
    }

    /// Remove a track. Playback stops if it was the current track.
    pub fn delete_track(&mut self, playlist_id: PlaylistId, track_id: TrackId) -> Result<Playlist> {
        let removal = self
            .mutations
            .delete_track(playlist_id, track_id)?
            .into_result()?;

        self.session.track_deleted(track_id);
        self.repository.apply(&removal.playlist);
        self.release_quietly(&removal.removed.source);
        Ok(removal.playlist)
    }

    /// Remove a playlist and release every media handle it held.
    pub fn delete_playlist(&mut self, id: PlaylistId) -> Result<Playlist> {
        let removed = self.mutations.delete_playlist(id)?.into_result()?;

        if self.session.current_playlist_id() == Some(id) {
            self.session.stop();
        }
        self.repository.remove(id);

        for track in &removed.tracks {
            self.release_quietly(&track.source);
        }
        if let Some(cover) = &removed.cover {
            self.release_quietly(cover);
        }
        Ok(removed)
    }

    // ----- Playback -----

    pub fn playback(&self) -> PlaybackSnapshot {
        self.session.snapshot()
    }

    /// Row click: toggles the current track, starts any other.
    pub fn play_track(&mut self, playlist_id: PlaylistId, track_id: TrackId) -> Result<Transition> {
        let track = self.lookup_track(playlist_id, track_id)?;
        Ok(self.session.activate_track(playlist_id, &track)?)
    }

    /// Start a track from the beginning, even if it is already current.
    pub fn select_track(
        &mut self,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<Transition> {
        let track = self.lookup_track(playlist_id, track_id)?;
        Ok(self.session.select_track(playlist_id, &track)?)
    }

    pub fn toggle_play_pause(&mut self) -> Result<Transition> {
        Ok(self.session.toggle_play_pause()?)
    }

    pub fn stop(&mut self) -> Transition {
        self.session.stop()
    }

    pub fn seek(&mut self, seconds: f64) -> Result<f64> {
        Ok(self.session.seek(seconds)?)
    }

    pub fn set_volume(&mut self, volume: f64) -> Result<f64> {
        Ok(self.session.set_volume(volume)?)
    }

    pub fn toggle_mute(&mut self) -> Result<bool> {
        Ok(self.session.toggle_mute()?)
    }

    /// Route an event from the audio element.
    ///
    /// `ended` advances through the current playlist as it is now. A newly
    /// reported duration is written back to the track, best-effort.
    pub fn handle_audio_event(&mut self, event: AudioEvent) -> Result<Transition> {
        let tracks: &[Track] = self
            .session
            .current_playlist_id()
            .and_then(|id| self.repository.get(id))
            .map(|playlist| playlist.tracks.as_slice())
            .unwrap_or_default();

        let transition = self.session.handle_event(event, tracks)?;

        if matches!(event, AudioEvent::DurationChange(_)) {
            self.record_duration();
        }
        Ok(transition)
    }

    fn record_duration(&mut self) {
        let Some(now) = self.session.now_playing() else {
            return;
        };
        let (playlist_id, track_id) = (now.playlist_id, now.track.id);
        let reported = self.session.transport().duration();
        if reported <= 0.0 {
            return;
        }

        match self.repository.track(playlist_id, track_id) {
            Some(track) if track.duration_seconds != reported => {}
            _ => return,
        }

        match self.mutations.set_track_duration(playlist_id, track_id, reported) {
            Ok(Mutation::Updated(playlist)) => self.repository.apply(&playlist),
            Ok(Mutation::NotFound { entity, id }) => {
                debug!(%entity, %id, "Duration not recorded, target is gone");
            }
            Err(e) => warn!(error = %e, %track_id, "Failed to record track duration"),
        }
    }

    fn lookup_track(&self, playlist_id: PlaylistId, track_id: TrackId) -> Result<Track> {
        let playlist = self
            .repository
            .get(playlist_id)
            .ok_or_else(|| not_found(EntityKind::Playlist, playlist_id))?;
        let track = playlist
            .track(track_id)
            .ok_or_else(|| not_found(EntityKind::Track, track_id))?;
        Ok(track.clone())
    }

    fn release_quietly(&self, media: &MediaRef) {
        if let Err(e) = self.media.release(media) {
            warn!(error = %e, media = %media, "Failed to release media handle");
        }
    }
}

fn not_found(entity: EntityKind, id: impl ToString) -> LibraryError {
    LibraryError::NotFound {
        entity_type: entity.to_string(),
        id: id.to_string(),
    }
}
