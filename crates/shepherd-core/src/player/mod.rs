//! Audio playback.
//!
//! The concrete audio backend is behind the [`AudioPlayer`] capability; the
//! [`PlaybackSession`] keeps the playlist and reports what started or
//! finished as [`PlaybackEvent`]s. It never navigates or counts progress
//! itself: callers hand the events to the tracker.

mod session;

pub use session::{BackgroundMusic, PlaybackSession};

use serde::{Deserialize, Serialize};

use crate::catalog::{AudioResource, QuoteId};
use crate::error::PlayerError;

/// Opaque handle to an audio backend.
pub trait AudioPlayer {
    fn load(&mut self, resource: &AudioResource) -> Result<(), PlayerError>;
    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self) -> Result<(), PlayerError>;
    /// `volume` is in 0.0..=1.0.
    fn set_volume(&mut self, volume: f32) -> Result<(), PlayerError>;
    fn set_looping(&mut self, looping: bool) -> Result<(), PlayerError>;
}

/// What the playback session did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlaybackEvent {
    /// A quote started. `restarted` is true when a new quote or playlist
    /// was chosen, as opposed to moving within the current playlist.
    Started { quote_id: QuoteId, restarted: bool },
    Paused { quote_id: QuoteId },
    Resumed { quote_id: QuoteId },
    /// The current quote played to the end.
    Finished { quote_id: QuoteId },
}

/// Player that accepts every command and produces no sound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NullPlayer {
    pub loaded: Option<AudioResource>,
    pub playing: bool,
    pub volume: f32,
    pub looping: bool,
}

impl AudioPlayer for NullPlayer {
    fn load(&mut self, resource: &AudioResource) -> Result<(), PlayerError> {
        self.loaded = Some(resource.clone());
        self.playing = false;
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.playing = false;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), PlayerError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlayerError::InvalidVolume(volume));
        }
        self.volume = volume;
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> Result<(), PlayerError> {
        self.looping = looping;
        Ok(())
    }
}
