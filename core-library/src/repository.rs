//! In-memory Playlist Repository
//!
//! The page-level materialized view of the collection. It is refreshed from
//! the [`StorageGateway`] on load and patched with the playlist each
//! successful mutation returns, so it never holds an edit that failed to
//! persist.

use crate::gateway::StorageGateway;
use crate::models::{Playlist, PlaylistId, Track, TrackId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistRepository {
    playlists: Vec<Playlist>,
}

impl PlaylistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_playlists(playlists: Vec<Playlist>) -> Self {
        Self { playlists }
    }

    /// Replace the view with what is currently stored.
    pub fn refresh(&mut self, gateway: &StorageGateway) {
        self.playlists = gateway.load_all();
    }

    /// Replace the playlist with the same id, or append it if unknown.
    pub fn apply(&mut self, playlist: &Playlist) {
        match self.playlists.iter_mut().find(|p| p.id == playlist.id) {
            Some(existing) => *existing = playlist.clone(),
            None => self.playlists.push(playlist.clone()),
        }
    }

    pub fn remove(&mut self, id: PlaylistId) -> Option<Playlist> {
        let index = self.playlists.iter().position(|p| p.id == id)?;
        Some(self.playlists.remove(index))
    }

    pub fn get(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    pub fn all(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn track(&self, playlist_id: PlaylistId, track_id: TrackId) -> Option<&Track> {
        self.get(playlist_id)?.track(track_id)
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }
}
