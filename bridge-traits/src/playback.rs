//! Playback bridge trait.
//!
//! The host's native audio element decodes, buffers and renders audio. The
//! core only drives it through [`AudioOutput`] and listens to the
//! [`AudioEvent`]s it reports. Implementations:
//! - Web: `HTMLAudioElement`
//! - Tests: `mockall` doubles

use crate::{error::Result, media::MediaRef, platform::PlatformSendSync};

/// Events emitted by the audio element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    /// Playback position changed, in seconds.
    TimeUpdate(f64),
    /// The element learned (or revised) the media duration, in seconds.
    DurationChange(f64),
    /// The current source played through to its end.
    Ended,
}

/// Control surface of a native audio element.
///
/// Calls are fire-and-forget: a successful `play()` means the request was
/// accepted, not that audio is audible. Asynchronous decode failures are not
/// reported back through this trait.
pub trait AudioOutput: PlatformSendSync {
    /// Point the element at new content. Any in-flight load of the previous
    /// source is abandoned.
    fn set_source(&self, source: &MediaRef) -> Result<()>;

    /// Start or resume playback of the current source.
    fn play(&self) -> Result<()>;

    /// Pause playback, keeping the position.
    fn pause(&self) -> Result<()>;

    /// Jump to an absolute position in seconds.
    fn set_current_time(&self, seconds: f64) -> Result<()>;

    /// Set output volume, normalized to `0.0..=1.0`.
    fn set_volume(&self, volume: f64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_events_compare_by_payload() {
        assert_eq!(AudioEvent::TimeUpdate(1.5), AudioEvent::TimeUpdate(1.5));
        assert_ne!(AudioEvent::DurationChange(10.0), AudioEvent::DurationChange(11.0));
        assert_ne!(AudioEvent::Ended, AudioEvent::TimeUpdate(0.0));
    }
}
