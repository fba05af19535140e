//! Transport state: position, duration, volume and mute.
//!
//! Pure bookkeeping. [`PlaybackSession`](crate::PlaybackSession) decides when
//! to push values to the audio element and only commits them here once the
//! element accepted them.

use core_runtime::config::DEFAULT_VOLUME;
use serde::Serialize;

/// Seek range shown before the element reports a duration.
pub const FALLBACK_SEEK_RANGE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    position: f64,
    duration: f64,
    volume: f64,
    muted: bool,
}

impl Transport {
    pub fn new(volume: f64) -> Self {
        Self {
            position: 0.0,
            duration: 0.0,
            volume: if volume.is_finite() {
                clamp_volume(volume)
            } else {
                DEFAULT_VOLUME
            },
            muted: false,
        }
    }

    /// Current position in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Duration reported by the element, 0 while unknown.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Upper bound for the seek slider.
    pub fn seek_range(&self) -> f64 {
        if self.duration > 0.0 {
            self.duration
        } else {
            FALLBACK_SEEK_RANGE
        }
    }

    /// Volume the user selected, independent of mute.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume the element should actually output.
    pub fn effective_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Volume to restore when unmuting.
    pub(crate) fn unmute_volume(&self) -> f64 {
        if self.volume > 0.0 {
            self.volume
        } else {
            DEFAULT_VOLUME
        }
    }

    /// Clamp a requested seek target to the playable range.
    pub(crate) fn clamp_seek(&self, seconds: f64) -> f64 {
        let target = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        if self.duration > 0.0 {
            target.min(self.duration)
        } else {
            target
        }
    }

    pub(crate) fn reset_for_track(&mut self, known_duration: f64) {
        self.position = 0.0;
        self.duration = sanitize_seconds(known_duration);
    }

    pub(crate) fn set_position(&mut self, seconds: f64) {
        self.position = sanitize_seconds(seconds);
    }

    pub(crate) fn set_duration(&mut self, seconds: f64) {
        self.duration = sanitize_seconds(seconds);
    }

    pub(crate) fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        self.muted = volume == 0.0;
    }

    pub(crate) fn mute(&mut self) {
        self.muted = true;
    }

    pub(crate) fn unmute_to(&mut self, volume: f64) {
        self.volume = volume;
        self.muted = false;
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

pub(crate) fn clamp_volume(volume: f64) -> f64 {
    volume.clamp(0.0, 1.0)
}

fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Format seconds as `m:ss`. Unknown or negative values render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.99), "0:09");
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(3725.4), "62:05");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-5.0), "0:00");
    }

    #[test]
    fn test_defaults() {
        let transport = Transport::default();
        assert_eq!(transport.volume(), 0.7);
        assert!(!transport.is_muted());
        assert_eq!(transport.seek_range(), FALLBACK_SEEK_RANGE);
    }

    #[test]
    fn test_volume_zero_mutes() {
        let mut transport = Transport::default();
        transport.set_volume(0.0);
        assert!(transport.is_muted());
        assert_eq!(transport.unmute_volume(), DEFAULT_VOLUME);

        transport.set_volume(0.4);
        assert!(!transport.is_muted());
        assert_eq!(transport.effective_volume(), 0.4);
    }

    #[test]
    fn test_mute_keeps_selected_volume() {
        let mut transport = Transport::new(0.3);
        transport.mute();
        assert_eq!(transport.effective_volume(), 0.0);
        assert_eq!(transport.volume(), 0.3);
        assert_eq!(transport.unmute_volume(), 0.3);
    }

    #[test]
    fn test_clamp_seek() {
        let mut transport = Transport::default();
        assert_eq!(transport.clamp_seek(-3.0), 0.0);
        assert_eq!(transport.clamp_seek(500.0), 500.0);

        transport.set_duration(120.0);
        assert_eq!(transport.clamp_seek(500.0), 120.0);
        assert_eq!(transport.clamp_seek(f64::NAN), 0.0);
    }

    #[test]
    fn test_reported_duration_is_sanitized() {
        let mut transport = Transport::default();
        transport.set_duration(f64::INFINITY);
        assert_eq!(transport.duration(), 0.0);
        transport.reset_for_track(42.0);
        assert_eq!(transport.duration(), 42.0);
        assert_eq!(transport.position(), 0.0);
    }
}
