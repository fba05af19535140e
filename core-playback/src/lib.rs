//! # Playback Module
//!
//! Drives the host's native audio element through the
//! [`AudioOutput`](bridge_traits::AudioOutput) bridge.
//!
//! ## Overview
//!
//! This module handles:
//! - The playback session state machine (`Idle` / `Paused` / `Playing`)
//! - Next-track lookup when the element reports the end of a source
//! - Transport bookkeeping: position, duration, volume and mute
//!
//! Decoding, buffering and output are the element's job; nothing here
//! touches audio samples.

pub mod error;
pub mod session;
pub mod transport;

pub use error::{PlaybackError, Result};
pub use session::{NowPlaying, PlaybackSession, PlaybackSnapshot, PlaybackState, Transition};
pub use transport::{format_time, Transport};
