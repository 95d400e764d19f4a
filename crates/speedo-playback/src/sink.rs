//! Simple media-player backend over a single `rodio::Sink`.

use crate::{Error, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use speedo_core::{Player, PlayerStatus};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    Idle,
    Loaded,
    Playing,
    Paused,
}

/// Plays one track at a time; speed changes resample on the fly.
///
/// Holds the output stream, so it must stay on the thread that created it.
pub struct SinkPlayer {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
    state: SinkState,
    speed: f32,
    duration: Option<Duration>,
}

impl SinkPlayer {
    /// Open the default output device.
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;
        sink.pause();

        Ok(Self {
            _stream: stream,
            _handle: handle,
            sink,
            state: SinkState::Idle,
            speed: 1.0,
            duration: None,
        })
    }

    fn open(&mut self, track: &Path) -> Result<()> {
        let file = BufReader::new(File::open(track)?);
        let source = Decoder::new(file)?;
        self.duration = source.total_duration();

        self.sink.clear();
        self.sink.append(source);
        self.sink.set_speed(self.speed);
        self.state = SinkState::Loaded;
        Ok(())
    }
}

impl Player for SinkPlayer {
    fn load(&mut self, track: &Path) -> speedo_core::Result<()> {
        tracing::debug!("sink: loading {}", track.display());
        Ok(self.open(track)?)
    }

    fn play(&mut self) -> speedo_core::Result<()> {
        if self.state == SinkState::Idle {
            return Err(Error::NothingLoaded.into());
        }
        self.sink.play();
        self.state = SinkState::Playing;
        Ok(())
    }

    fn pause(&mut self) -> speedo_core::Result<()> {
        if self.state == SinkState::Playing {
            self.sink.pause();
            self.state = SinkState::Paused;
        }
        Ok(())
    }

    fn stop(&mut self) -> speedo_core::Result<()> {
        self.sink.clear();
        self.state = SinkState::Idle;
        self.duration = None;
        Ok(())
    }

    fn set_speed(&mut self, speed: f32) -> speedo_core::Result<()> {
        self.speed = speed;
        self.sink.set_speed(speed);
        Ok(())
    }

    fn status(&self) -> PlayerStatus {
        match self.state {
            SinkState::Idle | SinkState::Loaded => PlayerStatus::Idle,
            _ if self.sink.empty() => PlayerStatus::Finished,
            SinkState::Playing => PlayerStatus::Playing,
            SinkState::Paused => PlayerStatus::Paused,
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn position(&self) -> Option<Duration> {
        match self.state {
            SinkState::Idle => None,
            _ => Some(self.sink.get_pos()),
        }
    }
}
