//! Contract the refresh loop expects from a playback backend.

use crate::Result;
use std::path::Path;
use std::time::Duration;

/// What the backend reports about the loaded track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    /// Nothing loaded, or stopped.
    #[default]
    Idle,
    Playing,
    Paused,
    /// The loaded track played to its end.
    Finished,
}

/// A playback backend with a settable speed.
///
/// Implementations only delegate to an audio library; decoding and output
/// are theirs. Calls arrive from a single thread.
pub trait Player {
    /// Replace the current track. Playback stays stopped until [`play`](Player::play).
    fn load(&mut self, track: &Path) -> Result<()>;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    /// Playback-rate multiplier (1.0 = normal).
    fn set_speed(&mut self, speed: f32) -> Result<()>;

    fn status(&self) -> PlayerStatus;

    /// Total length of the loaded track, if the backend knows it.
    fn duration(&self) -> Option<Duration> {
        None
    }

    /// Position within the loaded track, if the backend knows it.
    fn position(&self) -> Option<Duration> {
        None
    }
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn load(&mut self, track: &Path) -> Result<()> {
        (**self).load(track)
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }

    fn pause(&mut self) -> Result<()> {
        (**self).pause()
    }

    fn stop(&mut self) -> Result<()> {
        (**self).stop()
    }

    fn set_speed(&mut self, speed: f32) -> Result<()> {
        (**self).set_speed(speed)
    }

    fn status(&self) -> PlayerStatus {
        (**self).status()
    }

    fn duration(&self) -> Option<Duration> {
        (**self).duration()
    }

    fn position(&self) -> Option<Duration> {
        (**self).position()
    }
}
