//! Audio output for hosts without an audio element.
//!
//! [`SilentAudioOutput`] accepts every command and keeps the resulting element
//! state so headless hosts and tests can drive a playback session and inspect
//! what it asked for. Nothing is decoded or rendered.

use bridge_traits::{
    error::{BridgeError, Result},
    media::MediaRef,
    playback::AudioOutput,
};
use parking_lot::Mutex;
use tracing::debug;

/// Snapshot of what the element was told to do.
#[derive(Debug, Clone, PartialEq)]
pub struct SilentElementState {
    pub source: Option<MediaRef>,
    pub paused: bool,
    pub current_time: f64,
    pub volume: f64,
}

impl Default for SilentElementState {
    fn default() -> Self {
        Self {
            source: None,
            paused: true,
            current_time: 0.0,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct SilentAudioOutput {
    state: Mutex<SilentElementState>,
}

impl SilentAudioOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SilentElementState {
        self.state.lock().clone()
    }
}

impl AudioOutput for SilentAudioOutput {
    fn set_source(&self, source: &MediaRef) -> Result<()> {
        let mut state = self.state.lock();
        state.source = Some(source.clone());
        state.paused = true;
        state.current_time = 0.0;
        debug!(source = %source, "Silent output source set");
        Ok(())
    }

    fn play(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.source.is_none() {
            return Err(BridgeError::OperationFailed(
                "play() called without a source".to_string(),
            ));
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.state.lock().paused = true;
        Ok(())
    }

    fn set_current_time(&self, seconds: f64) -> Result<()> {
        self.state.lock().current_time = seconds;
        Ok(())
    }

    fn set_volume(&self, volume: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(BridgeError::OperationFailed(format!(
                "volume {volume} outside 0.0..=1.0"
            )));
        }
        self.state.lock().volume = volume;
        Ok(())
    }
}
