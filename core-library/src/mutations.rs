//! Mutation Operations
//!
//! Every operation re-reads the stored collection, changes exactly one
//! playlist (or appends / removes one), writes the whole collection back and
//! returns the affected playlist. Working from a fresh read means callers may
//! hold a stale in-memory view without losing edits made through another
//! handle to the same store.
//!
//! A missing playlist or track is reported as [`Mutation::NotFound`] and
//! nothing is written.

use std::fmt;
use std::sync::Arc;

use bridge_traits::{Clock, MediaRef};
use core_runtime::CoreConfig;
use tracing::debug;

use crate::error::{LibraryError, Result};
use crate::gateway::StorageGateway;
use crate::models::{is_blank, title_or_default, Playlist, PlaylistId, Track, TrackId};

/// Which kind of entity a mutation could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Playlist,
    Track,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Playlist => f.write_str("Playlist"),
            EntityKind::Track => f.write_str("Track"),
        }
    }
}

/// Outcome of a mutation that targets an existing entity.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Mutation<T> {
    /// The change was applied and persisted.
    Updated(T),
    /// The target did not exist; storage was left untouched.
    NotFound { entity: EntityKind, id: String },
}

impl<T> Mutation<T> {
    fn not_found(entity: EntityKind, id: impl ToString) -> Self {
        Mutation::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Mutation::Updated(_))
    }

    pub fn as_updated(&self) -> Option<&T> {
        match self {
            Mutation::Updated(value) => Some(value),
            Mutation::NotFound { .. } => None,
        }
    }

    /// Discard the not-found case, keeping only an applied change.
    pub fn updated(self) -> Option<T> {
        match self {
            Mutation::Updated(value) => Some(value),
            Mutation::NotFound { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mutation<U> {
        match self {
            Mutation::Updated(value) => Mutation::Updated(f(value)),
            Mutation::NotFound { entity, id } => Mutation::NotFound { entity, id },
        }
    }

    /// Turn a missing target into [`LibraryError::NotFound`].
    pub fn into_result(self) -> Result<T> {
        match self {
            Mutation::Updated(value) => Ok(value),
            Mutation::NotFound { entity, id } => Err(LibraryError::NotFound {
                entity_type: entity.to_string(),
                id,
            }),
        }
    }
}

/// A track removed from its playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRemoval {
    /// The playlist as persisted after the removal
    pub playlist: Playlist,
    /// The track that was removed
    pub removed: Track,
}

/// Named read-modify-write operations over the stored collection.
#[derive(Clone)]
pub struct PlaylistMutations {
    gateway: StorageGateway,
    clock: Arc<dyn Clock>,
    untitled_title: String,
}

impl PlaylistMutations {
    pub fn new(
        gateway: StorageGateway,
        clock: Arc<dyn Clock>,
        untitled_title: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            clock,
            untitled_title: untitled_title.into(),
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(
            StorageGateway::from_config(config),
            config.clock.clone(),
            config.untitled_playlist_title.clone(),
        )
    }

    pub fn gateway(&self) -> &StorageGateway {
        &self.gateway
    }

    /// Create an empty playlist and append it to the collection.
    ///
    /// A blank `title` is replaced with the configured default.
    pub fn create_playlist(&self, title: &str, cover: Option<MediaRef>) -> Result<Playlist> {
        let mut collection = self.gateway.load_for_update()?;
        let playlist = Playlist::new(
            title_or_default(title, &self.untitled_title),
            cover,
            self.clock.now(),
        );
        collection.push(playlist.clone());
        self.gateway.save_all(&collection)?;

        debug!(playlist_id = %playlist.id, title = %playlist.title, "Created playlist");
        Ok(playlist)
    }

    /// Replace a playlist's title. A blank title becomes the configured default.
    pub fn rename_playlist(&self, id: PlaylistId, title: &str) -> Result<Mutation<Playlist>> {
        let title = title_or_default(title, &self.untitled_title);
        self.modify("rename_playlist", id, |playlist| {
            playlist.title = title;
            Mutation::Updated(())
        })
        .map(drop_outcome)
    }

    /// Replace (or clear) a playlist's cover image.
    pub fn set_cover(&self, id: PlaylistId, cover: Option<MediaRef>) -> Result<Mutation<Playlist>> {
        self.modify("set_cover", id, |playlist| {
            playlist.cover = cover;
            Mutation::Updated(())
        })
        .map(drop_outcome)
    }

    /// Append a track for an uploaded file.
    ///
    /// The track is titled after `file_name` without its extension, starts
    /// with a zero duration, and lands at the end of the playlist.
    pub fn add_track(
        &self,
        playlist_id: PlaylistId,
        file_name: &str,
        source: MediaRef,
    ) -> Result<Mutation<Playlist>> {
        let track = Track::from_upload(file_name, source, self.clock.now());
        let track_id = track.id;
        let result = self.modify("add_track", playlist_id, |playlist| {
            playlist.tracks.push(track);
            Mutation::Updated(())
        })?;

        if result.is_updated() {
            debug!(%playlist_id, %track_id, "Track appended");
        }
        Ok(result.map(|(playlist, ())| playlist))
    }

    /// Replace a track's title. A blank title keeps the previous one.
    pub fn rename_track(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
        title: &str,
    ) -> Result<Mutation<Playlist>> {
        let keep_previous = is_blank(title);
        self.modify("rename_track", playlist_id, |playlist| {
            match playlist.track_mut(track_id) {
                Some(track) => {
                    if !keep_previous {
                        track.title = title.to_string();
                    }
                    Mutation::Updated(())
                }
                None => Mutation::not_found(EntityKind::Track, track_id),
            }
        })
        .map(drop_outcome)
    }

    /// Record the duration the audio element reported for a track.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::InvalidInput`] for negative or non-finite
    /// values without touching storage.
    pub fn set_track_duration(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
        seconds: f64,
    ) -> Result<Mutation<Playlist>> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(LibraryError::InvalidInput {
                field: "duration".to_string(),
                message: format!("must be a non-negative number of seconds, got {}", seconds),
            });
        }

        self.modify("set_track_duration", playlist_id, |playlist| {
            match playlist.track_mut(track_id) {
                Some(track) => {
                    track.duration_seconds = seconds;
                    Mutation::Updated(())
                }
                None => Mutation::not_found(EntityKind::Track, track_id),
            }
        })
        .map(drop_outcome)
    }

    /// Remove a track, keeping the remaining tracks in their relative order.
    pub fn delete_track(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<Mutation<TrackRemoval>> {
        let result = self.modify("delete_track", playlist_id, |playlist| {
            match playlist.track_position(track_id) {
                Some(index) => Mutation::Updated(playlist.tracks.remove(index)),
                None => Mutation::not_found(EntityKind::Track, track_id),
            }
        })?;

        Ok(result.map(|(playlist, removed)| TrackRemoval { playlist, removed }))
    }

    /// Remove a whole playlist from the collection and return it.
    pub fn delete_playlist(&self, id: PlaylistId) -> Result<Mutation<Playlist>> {
        let mut collection = self.gateway.load_for_update()?;
        let Some(index) = collection.iter().position(|playlist| playlist.id == id) else {
            debug!(operation = "delete_playlist", playlist_id = %id, "Playlist not found");
            return Ok(Mutation::not_found(EntityKind::Playlist, id));
        };

        let removed = collection.remove(index);
        self.gateway.save_all(&collection)?;

        debug!(playlist_id = %id, tracks = removed.tracks.len(), "Deleted playlist");
        Ok(Mutation::Updated(removed))
    }

    /// Load, apply `change` to the playlist with `id`, save.
    ///
    /// Nothing is written unless `change` reports an update.
    fn modify<T>(
        &self,
        operation: &'static str,
        id: PlaylistId,
        change: impl FnOnce(&mut Playlist) -> Mutation<T>,
    ) -> Result<Mutation<(Playlist, T)>> {
        let mut collection = self.gateway.load_for_update()?;
        let Some(playlist) = collection.iter_mut().find(|playlist| playlist.id == id) else {
            debug!(operation, playlist_id = %id, "Playlist not found");
            return Ok(Mutation::not_found(EntityKind::Playlist, id));
        };

        let outcome = match change(playlist) {
            Mutation::Updated(outcome) => outcome,
            Mutation::NotFound { entity, id: missing } => {
                debug!(operation, playlist_id = %id, %entity, id = %missing, "Target not found");
                return Ok(Mutation::NotFound {
                    entity,
                    id: missing,
                });
            }
        };
        let updated = playlist.clone();

        self.gateway.save_all(&collection)?;
        debug!(operation, playlist_id = %id, "Playlist updated");
        Ok(Mutation::Updated((updated, outcome)))
    }
}

fn drop_outcome(result: Mutation<(Playlist, ())>) -> Mutation<Playlist> {
    result.map(|(playlist, ())| playlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::MemoryKeyValueStore;
    use bridge_traits::{BridgeError, FixedClock, KeyValueStore};
    use chrono::{TimeZone, Utc};

    fn setup() -> (Arc<MemoryKeyValueStore>, PlaylistMutations) {
        let store = Arc::new(MemoryKeyValueStore::new());
        let gateway = StorageGateway::new(store.clone(), "playlists");
        let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()));
        (store, PlaylistMutations::new(gateway, clock, "Untitled Playlist"))
    }

    fn media(name: &str) -> MediaRef {
        MediaRef::new(format!("mem:audio/{name}"))
    }

    #[test]
    fn test_create_playlist_defaults_blank_title() {
        let (_, mutations) = setup();
        let playlist = mutations.create_playlist("", None).unwrap();

        assert_eq!(playlist.title, "Untitled Playlist");
        assert!(playlist.tracks.is_empty());
        assert_eq!(mutations.gateway().load_all(), vec![playlist]);
    }

    #[test]
    fn test_create_playlist_keeps_cover() {
        let (_, mutations) = setup();
        let cover = MediaRef::new("mem:image/1");
        let playlist = mutations.create_playlist("Covers", Some(cover.clone())).unwrap();
        assert_eq!(playlist.cover, Some(cover));
        assert_eq!(playlist.created_at, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn test_rename_playlist() {
        let (_, mutations) = setup();
        let playlist = mutations.create_playlist("Old", None).unwrap();

        let renamed = mutations
            .rename_playlist(playlist.id, "New")
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(renamed.title, "New");
        assert_eq!(renamed.created_at, playlist.created_at);

        let blank = mutations.rename_playlist(playlist.id, "  ").unwrap();
        assert_eq!(blank.updated().unwrap().title, "Untitled Playlist");
    }

    #[test]
    fn test_missing_playlist_does_not_write() {
        let (store, mutations) = setup();
        let result = mutations.rename_playlist(PlaylistId::new(), "Ghost").unwrap();

        assert!(matches!(
            result,
            Mutation::NotFound {
                entity: EntityKind::Playlist,
                ..
            }
        ));
        assert!(store.get_string("playlists").unwrap().is_none());
    }

    #[test]
    fn test_not_found_into_result() {
        let (_, mutations) = setup();
        let id = PlaylistId::new();
        let err = mutations.set_cover(id, None).unwrap().into_result().unwrap_err();

        match err {
            LibraryError::NotFound { entity_type, id: missing } => {
                assert_eq!(entity_type, "Playlist");
                assert_eq!(missing, id.to_string());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_set_cover_replaces_and_clears() {
        let (_, mutations) = setup();
        let playlist = mutations.create_playlist("Art", None).unwrap();
        let cover = MediaRef::new("mem:image/2");

        let updated = mutations.set_cover(playlist.id, Some(cover.clone())).unwrap();
        assert_eq!(updated.as_updated().unwrap().cover, Some(cover));

        let cleared = mutations.set_cover(playlist.id, None).unwrap();
        assert_eq!(cleared.as_updated().unwrap().cover, None);
        assert_eq!(cleared.as_updated().unwrap().title, "Art");
    }

    #[test]
    fn test_add_track_appends() {
        let (_, mutations) = setup();
        let playlist = mutations.create_playlist("Mix", None).unwrap();

        mutations.add_track(playlist.id, "first.mp3", media("1")).unwrap();
        let updated = mutations
            .add_track(playlist.id, "second.ogg", media("2"))
            .unwrap()
            .into_result()
            .unwrap();

        let titles: Vec<_> = updated.tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
        assert_eq!(updated.tracks[1].source, media("2"));
        assert_eq!(updated.tracks[1].duration_seconds, 0.0);
    }

    #[test]
    fn test_rename_track_ignores_blank() {
        let (_, mutations) = setup();
        let playlist = mutations.create_playlist("Mix", None).unwrap();
        let playlist = mutations
            .add_track(playlist.id, "demo.wav", media("1"))
            .unwrap()
            .into_result()
            .unwrap();
        let track_id = playlist.tracks[0].id;

        let kept = mutations.rename_track(playlist.id, track_id, "").unwrap();
        assert_eq!(kept.as_updated().unwrap().tracks[0].title, "demo");

        let renamed = mutations.rename_track(playlist.id, track_id, "Final Take").unwrap();
        assert_eq!(renamed.as_updated().unwrap().tracks[0].title, "Final Take");
    }

    #[test]
    fn test_rename_missing_track() {
        let (_, mutations) = setup();
        let playlist = mutations.create_playlist("Mix", None).unwrap();
        let missing = TrackId::new();

        let result = mutations.rename_track(playlist.id, missing, "x").unwrap();
        assert_eq!(
            result,
            Mutation::NotFound {
                entity: EntityKind::Track,
                id: missing.to_string()
            }
        );
    }

    #[test]
    fn test_delete_track_preserves_order() {
        let (_, mutations) = setup();
        let playlist = mutations.create_playlist("Mix", None).unwrap();
        for name in ["a.mp3", "b.mp3", "c.mp3"] {
            mutations.add_track(playlist.id, name, media(name)).unwrap();
        }
        let stored = mutations.gateway().load_all();
        let b = stored[0].tracks[1].id;

        let removal = mutations
            .delete_track(playlist.id, b)
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!(removal.removed.title, "b");
        let titles: Vec<_> = removal.playlist.tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "c"]);
        assert_eq!(mutations.gateway().load_all()[0], removal.playlist);
    }

    #[test]
    fn test_set_track_duration() {
        let (store, mutations) = setup();
        let playlist = mutations.create_playlist("Mix", None).unwrap();
        let playlist = mutations
            .add_track(playlist.id, "a.mp3", media("a"))
            .unwrap()
            .into_result()
            .unwrap();
        let track_id = playlist.tracks[0].id;

        let updated = mutations.set_track_duration(playlist.id, track_id, 183.25).unwrap();
        assert_eq!(updated.as_updated().unwrap().tracks[0].duration_seconds, 183.25);

        let before = store.get_string("playlists").unwrap();
        for bad in [-1.0, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                mutations.set_track_duration(playlist.id, track_id, bad),
                Err(LibraryError::InvalidInput { .. })
            ));
        }
        assert_eq!(store.get_string("playlists").unwrap(), before);
    }

    #[test]
    fn test_delete_playlist() {
        let (_, mutations) = setup();
        let keep = mutations.create_playlist("Keep", None).unwrap();
        let doomed = mutations.create_playlist("Drop", None).unwrap();

        let removed = mutations.delete_playlist(doomed.id).unwrap().into_result().unwrap();
        assert_eq!(removed.id, doomed.id);
        assert_eq!(mutations.gateway().load_all(), vec![keep]);

        assert!(!mutations.delete_playlist(doomed.id).unwrap().is_updated());
    }

    #[test]
    fn test_stale_view_does_not_lose_edits() {
        let (store, first) = setup();
        let second = PlaylistMutations::new(
            StorageGateway::new(store.clone(), "playlists"),
            Arc::new(FixedClock(Utc::now())),
            "Untitled Playlist",
        );

        let a = first.create_playlist("A", None).unwrap();
        let b = second.create_playlist("B", None).unwrap();
        first.rename_playlist(a.id, "A2").unwrap();

        let stored = first.gateway().load_all();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].title, "A2");
        assert_eq!(stored[1].id, b.id);
    }

    #[test]
    fn test_malformed_store_is_replaced_on_create() {
        let (store, mutations) = setup();
        store.set_string("playlists", "definitely not json").unwrap();

        let playlist = mutations.create_playlist("Fresh", None).unwrap();
        assert_eq!(mutations.gateway().load_all(), vec![playlist]);
    }

    #[test]
    fn test_quota_failure_keeps_previous_collection() {
        let store = Arc::new(MemoryKeyValueStore::with_quota(400));
        let mutations = PlaylistMutations::new(
            StorageGateway::new(store.clone(), "playlists"),
            Arc::new(FixedClock(Utc::now())),
            "Untitled Playlist",
        );
        let playlist = mutations.create_playlist("Small", None).unwrap();
        let before = store.get_string("playlists").unwrap();

        let long_name = format!("{}.mp3", "x".repeat(500));
        let err = mutations
            .add_track(playlist.id, &long_name, media("big"))
            .unwrap_err();

        assert!(err.is_quota_exceeded());
        assert_eq!(store.get_string("playlists").unwrap(), before);
    }

    mockall::mock! {
        Store {}

        impl KeyValueStore for Store {
            fn get_string(&self, key: &str) -> bridge_traits::error::Result<Option<String>>;
            fn set_string(&self, key: &str, value: &str) -> bridge_traits::error::Result<()>;
            fn remove(&self, key: &str) -> bridge_traits::error::Result<()>;
        }
    }

    #[test]
    fn test_read_failure_never_overwrites() {
        let mut store = MockStore::new();
        store
            .expect_get_string()
            .returning(|_| Err(BridgeError::NotAvailable("localStorage".into())));
        store.expect_set_string().never();

        let mutations = PlaylistMutations::new(
            StorageGateway::new(Arc::new(store), "playlists"),
            Arc::new(FixedClock(Utc::now())),
            "Untitled Playlist",
        );

        let err = mutations.create_playlist("Lost", None).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::Bridge(BridgeError::NotAvailable(_))
        ));
    }
}
