//! Pipeline backend: file → decode → varispeed → convert → device.
//!
//! The control thread owns [`PipelinePlayer`]; the audio callback only sees
//! [`PipelineShared`]. Speed, transport flags and position cross between
//! them as atomics. Each track is decoded on its own thread into a bounded
//! ring buffer ([`TrackStream`]); the stream and its read head sit behind a
//! `parking_lot::Mutex` that the callback only ever `try_lock`s.

mod decode;
mod output;
mod varispeed;

pub use decode::{FrameSource, Pull, TrackStream};
pub use varispeed::{VarispeedReader, MIN_SPEED};

use crate::{Error, Result};
use output::OutputStream;
use parking_lot::Mutex;
use speedo_core::{AtomicDouble, AtomicFlag, AtomicFloat, Player, PlayerStatus};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// List output devices as `"index: name"`.
pub fn output_devices() -> Result<Vec<String>> {
    output::list_devices()
}

#[derive(Default)]
struct Voice {
    stream: Option<(TrackStream, VarispeedReader)>,
}

/// State shared with the audio callback.
pub struct PipelineShared {
    voice: Mutex<Voice>,
    speed: AtomicFloat,
    playing: AtomicFlag,
    finished: AtomicFlag,
    /// Seconds into the current track.
    position: AtomicDouble,
}

impl Default for PipelineShared {
    fn default() -> Self {
        Self {
            voice: Mutex::new(Voice::default()),
            speed: AtomicFloat::new(1.0),
            playing: AtomicFlag::new(false),
            finished: AtomicFlag::new(false),
            position: AtomicDouble::new(0.0),
        }
    }
}

impl PipelineShared {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill one device buffer. Never blocks: if the control thread holds the
    /// track, this buffer is silent.
    pub fn render(&self, out: &mut [f32], channels: usize, output_rate: u32) {
        if !self.playing.get() {
            out.fill(0.0);
            return;
        }

        let Some(mut voice) = self.voice.try_lock() else {
            out.fill(0.0);
            return;
        };
        let Some((stream, reader)) = voice.stream.as_mut() else {
            out.fill(0.0);
            return;
        };

        let step = VarispeedReader::step(self.speed.get(), stream.sample_rate(), output_rate);
        let done = reader.render(stream, step, out, channels);
        self.position
            .set(reader.position() / stream.sample_rate() as f64);

        if done {
            self.playing.set(false);
            self.finished.set(true);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished.get()
    }

    pub fn position(&self) -> Duration {
        Duration::from_secs_f64(self.position.get())
    }
}

/// Player driving its own cpal output stream from a decoded file (mp3,
/// flac, ogg or wav).
///
/// The output stream runs for the life of the player and renders silence
/// while nothing is playing.
pub struct PipelinePlayer {
    shared: Arc<PipelineShared>,
    output: Option<OutputStream>,
    loaded: bool,
    duration: Option<Duration>,
}

impl PipelinePlayer {
    /// Open the default output device.
    pub fn new() -> Result<Self> {
        Self::with_device(None)
    }

    /// Open the output device at `index` (see [`output_devices`]).
    pub fn with_device(index: Option<usize>) -> Result<Self> {
        let shared = Arc::new(PipelineShared::new());
        let output = OutputStream::open(index, shared.clone())?;
        Ok(Self {
            shared,
            output: Some(output),
            loaded: false,
            duration: None,
        })
    }

    /// A player with no device attached; buffers are pulled through [`shared`](Self::shared).
    pub fn detached() -> Self {
        Self {
            shared: Arc::new(PipelineShared::new()),
            output: None,
            loaded: false,
            duration: None,
        }
    }

    pub fn shared(&self) -> &Arc<PipelineShared> {
        &self.shared
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.output.as_ref().map(|o| o.sample_rate)
    }

    pub fn channels(&self) -> Option<usize> {
        self.output.as_ref().map(|o| o.channels)
    }

    fn open(&mut self, track: &Path) -> Result<()> {
        self.shared.playing.set(false);
        self.unload();

        let stream = TrackStream::open(track)?;
        if let Some(rate) = self.sample_rate() {
            if rate != stream.sample_rate() {
                tracing::debug!(
                    "pipeline: resampling {} Hz to {rate} Hz",
                    stream.sample_rate()
                );
            }
        }
        self.duration = stream.duration();

        let reader = VarispeedReader::new(stream.channels());
        self.shared.voice.lock().stream = Some((stream, reader));
        self.loaded = true;
        Ok(())
    }

    /// Drop the current stream, which also stops its decoder thread.
    fn unload(&mut self) {
        let previous = self.shared.voice.lock().stream.take();
        drop(previous);
        self.shared.finished.set(false);
        self.shared.position.set(0.0);
        self.loaded = false;
        self.duration = None;
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl Player for PipelinePlayer {
    fn load(&mut self, track: &Path) -> speedo_core::Result<()> {
        tracing::debug!("pipeline: loading {}", track.display());
        Ok(self.open(track)?)
    }

    fn play(&mut self) -> speedo_core::Result<()> {
        if !self.is_loaded() {
            return Err(Error::NothingLoaded.into());
        }
        if !self.shared.finished.get() {
            self.shared.playing.set(true);
        }
        Ok(())
    }

    fn pause(&mut self) -> speedo_core::Result<()> {
        self.shared.playing.set(false);
        Ok(())
    }

    fn stop(&mut self) -> speedo_core::Result<()> {
        self.shared.playing.set(false);
        self.unload();
        Ok(())
    }

    fn set_speed(&mut self, speed: f32) -> speedo_core::Result<()> {
        self.shared.speed.set(speed.max(MIN_SPEED as f32));
        Ok(())
    }

    fn status(&self) -> PlayerStatus {
        if !self.is_loaded() {
            PlayerStatus::Idle
        } else if self.shared.finished.get() {
            PlayerStatus::Finished
        } else if self.shared.playing.get() {
            PlayerStatus::Playing
        } else {
            PlayerStatus::Paused
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn position(&self) -> Option<Duration> {
        self.is_loaded().then(|| self.shared.position())
    }
}
