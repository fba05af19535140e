//! Playback session behavior against a recording audio element
//!
//! This test suite verifies:
//! - Positional next-track lookup on `ended`
//! - Deleting the current track clears the session
//! - Stale media references are reported without touching the element
//! - A refused load keeps the session and the element on the same track

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bridge_desktop::MemoryMediaRegistry;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    AudioEvent, AudioOutput, BridgeError, MediaKind, MediaRef, MediaRegistry, MediaUpload,
};
use chrono::Utc;
use core_library::{PlaylistId, Track};
use core_playback::{PlaybackError, PlaybackSession, PlaybackState, Transition};

// ============================================================================
// Recording AudioOutput
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Command {
    SetSource(String),
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
}

#[derive(Clone, Default)]
struct RecordingOutput {
    log: Arc<Mutex<Vec<Command>>>,
    refuse_play: Arc<AtomicBool>,
}

impl RecordingOutput {
    fn record(&self, command: Command) -> BridgeResult<()> {
        self.log.lock().unwrap().push(command);
        Ok(())
    }

    fn commands(&self) -> Vec<Command> {
        self.log.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    /// Make `play()` fail the way an autoplay block does.
    fn refuse_play(&self, refuse: bool) {
        self.refuse_play.store(refuse, Ordering::SeqCst);
    }

    /// The source the element was last pointed at.
    fn source(&self) -> Option<String> {
        self.commands().into_iter().rev().find_map(|command| match command {
            Command::SetSource(source) => Some(source),
            _ => None,
        })
    }
}

impl AudioOutput for RecordingOutput {
    fn set_source(&self, source: &MediaRef) -> BridgeResult<()> {
        self.record(Command::SetSource(source.to_string()))
    }

    fn play(&self) -> BridgeResult<()> {
        if self.refuse_play.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("NotAllowedError".to_string()));
        }
        self.record(Command::Play)
    }

    fn pause(&self) -> BridgeResult<()> {
        self.record(Command::Pause)
    }

    fn set_current_time(&self, seconds: f64) -> BridgeResult<()> {
        self.record(Command::Seek(seconds))
    }

    fn set_volume(&self, volume: f64) -> BridgeResult<()> {
        self.record(Command::Volume(volume))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn tracks(names: &[&str]) -> Vec<Track> {
    names
        .iter()
        .map(|name| {
            Track::from_upload(name, MediaRef::new(format!("mem:audio/{name}")), Utc::now())
        })
        .collect()
}

fn session() -> (RecordingOutput, PlaybackSession) {
    let output = RecordingOutput::default();
    let session = PlaybackSession::new(Box::new(output.clone()), 0.7);
    (output, session)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn ended_advances_to_following_track() {
    let (output, mut session) = session();
    let playlist_id = PlaylistId::new();
    let list = tracks(&["a.mp3", "b.mp3", "c.mp3"]);

    session.select_track(playlist_id, &list[1]).unwrap();
    output.clear();

    let transition = session.handle_event(AudioEvent::Ended, &list).unwrap();

    assert_eq!(transition, Transition::Advanced);
    assert_eq!(session.current_track_id(), Some(list[2].id));
    assert!(session.is_playing());
    assert_eq!(
        output.commands(),
        vec![
            Command::SetSource(list[2].source.to_string()),
            Command::Volume(0.7),
            Command::Play,
        ]
    );
}

#[test]
fn ended_on_last_track_pauses_at_end() {
    let (output, mut session) = session();
    let playlist_id = PlaylistId::new();
    let list = tracks(&["a.mp3", "b.mp3", "c.mp3"]);

    session.select_track(playlist_id, &list[2]).unwrap();
    session
        .handle_event(AudioEvent::DurationChange(95.0), &list)
        .unwrap();
    output.clear();

    let transition = session.handle_event(AudioEvent::Ended, &list).unwrap();

    assert_eq!(transition, Transition::Finished);
    assert_eq!(session.state(), PlaybackState::Paused);
    assert_eq!(session.current_track_id(), Some(list[2].id));
    assert_eq!(session.transport().position(), 95.0);
    assert!(output.commands().is_empty());
}

#[test]
fn next_lookup_uses_sequence_at_event_time() {
    let (_, mut session) = session();
    let playlist_id = PlaylistId::new();
    let mut list = tracks(&["a.mp3", "b.mp3", "c.mp3", "d.mp3"]);

    session.select_track(playlist_id, &list[1]).unwrap();
    // "c" was deleted while "b" played.
    list.remove(2);

    session.track_ended(&list).unwrap();
    assert_eq!(session.current_track_id(), Some(list[2].id));
    assert_eq!(session.now_playing().unwrap().track.title, "d");
}

#[test]
fn ended_for_track_missing_from_sequence_finishes() {
    let (_, mut session) = session();
    let list = tracks(&["a.mp3", "b.mp3"]);
    session.select_track(PlaylistId::new(), &list[0]).unwrap();

    let transition = session.track_ended(&list[1..]).unwrap();

    assert_eq!(transition, Transition::Finished);
    assert_eq!(session.state(), PlaybackState::Paused);
}

#[test]
fn deleting_current_track_goes_idle() {
    for start_paused in [false, true] {
        let (_, mut session) = session();
        let list = tracks(&["a.mp3", "b.mp3", "c.mp3"]);
        session.select_track(PlaylistId::new(), &list[1]).unwrap();
        if start_paused {
            session.toggle_play_pause().unwrap();
        }

        assert_eq!(session.track_deleted(list[1].id), Transition::Stopped);
        assert_eq!(session.state(), PlaybackState::Idle);
        assert!(!session.is_playing());
        assert!(session.now_playing().is_none());
    }
}

#[test]
fn deleting_other_track_keeps_playing() {
    let (_, mut session) = session();
    let list = tracks(&["a.mp3", "b.mp3"]);
    session.select_track(PlaylistId::new(), &list[0]).unwrap();

    assert_eq!(session.track_deleted(list[1].id), Transition::Unchanged);
    assert_eq!(session.state(), PlaybackState::Playing);
}

#[test]
fn stale_reference_is_unavailable() {
    let registry = Arc::new(MemoryMediaRegistry::new());
    let output = RecordingOutput::default();
    let mut session = PlaybackSession::new(Box::new(output.clone()), 0.7)
        .with_media_registry(registry.clone());

    // Persisted before a reload: the registry has never seen it.
    let stale = Track::from_upload(
        "old.mp3",
        MediaRef::new("blob:http://localhost/gone"),
        Utc::now(),
    );
    let err = session.select_track(PlaylistId::new(), &stale).unwrap_err();

    assert!(matches!(err, PlaybackError::SourceUnavailable(_)));
    assert!(err.is_stale_source());
    assert_eq!(session.state(), PlaybackState::Idle);
    assert!(output.commands().is_empty());

    let live_ref = registry
        .register(MediaKind::Audio, &MediaUpload::new("new.mp3", bytes::Bytes::from_static(b"ID3")))
        .unwrap();
    let live = Track::from_upload("new.mp3", live_ref, Utc::now());
    assert_eq!(session.select_track(PlaylistId::new(), &live).unwrap(), Transition::Started);
}

#[test]
fn muted_session_loads_tracks_silently() {
    let (output, mut session) = session();
    session.toggle_mute().unwrap();
    output.clear();

    let list = tracks(&["a.mp3"]);
    session.select_track(PlaylistId::new(), &list[0]).unwrap();

    assert!(output.commands().contains(&Command::Volume(0.0)));
}

#[test]
fn refused_switch_keeps_element_on_current_track() {
    let (output, mut session) = session();
    let playlist_id = PlaylistId::new();
    let list = tracks(&["a.mp3", "b.mp3"]);

    session.select_track(playlist_id, &list[0]).unwrap();
    session.handle_event(AudioEvent::TimeUpdate(42.0), &list).unwrap();
    output.refuse_play(true);

    let err = session.select_track(playlist_id, &list[1]).unwrap_err();

    assert!(matches!(err, PlaybackError::Output(_)));
    assert_eq!(session.current_track_id(), Some(list[0].id));
    assert_eq!(session.state(), PlaybackState::Paused);
    assert_eq!(output.source(), Some(list[0].source.to_string()));
    assert_eq!(output.commands().last(), Some(&Command::Seek(42.0)));

    // Resuming works once the element accepts play() again.
    output.refuse_play(false);
    assert_eq!(session.toggle_play_pause().unwrap(), Transition::Resumed);
}

#[test]
fn refused_advance_stays_on_ended_track() {
    let (output, mut session) = session();
    let playlist_id = PlaylistId::new();
    let list = tracks(&["a.mp3", "b.mp3"]);

    session.select_track(playlist_id, &list[0]).unwrap();
    session.handle_event(AudioEvent::DurationChange(180.0), &list).unwrap();
    output.refuse_play(true);

    assert!(session.handle_event(AudioEvent::Ended, &list).is_err());

    assert_eq!(session.current_track_id(), Some(list[0].id));
    assert_eq!(session.state(), PlaybackState::Paused);
    assert_eq!(session.transport().position(), 180.0);
    assert_eq!(output.source(), Some(list[0].source.to_string()));
}

#[test]
fn advance_into_stale_track_is_unavailable() {
    let registry = Arc::new(MemoryMediaRegistry::new());
    let output = RecordingOutput::default();
    let mut session = PlaybackSession::new(Box::new(output.clone()), 0.7)
        .with_media_registry(registry.clone());

    let a_ref = registry
        .register(
            MediaKind::Audio,
            &MediaUpload::new("a.mp3", bytes::Bytes::from_static(b"ID3")),
        )
        .unwrap();
    let a = Track::from_upload("a.mp3", a_ref, Utc::now());
    // Saved before a reload, so the registry never issued it.
    let b = Track::from_upload(
        "b.mp3",
        MediaRef::new("blob:http://localhost/gone"),
        Utc::now(),
    );
    let list = vec![a.clone(), b.clone()];

    session.select_track(PlaylistId::new(), &a).unwrap();
    output.clear();

    let err = session.handle_event(AudioEvent::Ended, &list).unwrap_err();

    assert!(matches!(err, PlaybackError::SourceUnavailable(_)));
    assert_eq!(session.current_track_id(), Some(a.id));
    assert_eq!(session.state(), PlaybackState::Paused);
    assert!(!output
        .commands()
        .contains(&Command::SetSource(b.source.to_string())));
}
