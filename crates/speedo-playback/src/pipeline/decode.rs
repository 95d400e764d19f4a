//! Source and decoder stages: a file decoded on its own thread into a
//! bounded ring buffer that the audio callback drains.

use crate::{Error, Result};
use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapCons, HeapProd, HeapRb,
};
use rodio::{Decoder, Source};
use speedo_core::AtomicFlag;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Seconds of audio held ahead of the read head.
const BUFFER_SECONDS: usize = 2;
const MIN_BUFFER_SAMPLES: usize = 4096;
/// Longest `open` waits for the first half of the buffer.
const PREFILL_TIMEOUT: Duration = Duration::from_secs(1);
const FEED_IDLE: Duration = Duration::from_millis(2);

/// Result of asking a source for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    Frame,
    /// Nothing buffered yet; the decoder is behind.
    Underrun,
    End,
}

/// Interleaved frames, pulled one at a time by the speed stage.
pub trait FrameSource {
    fn channels(&self) -> usize;

    fn sample_rate(&self) -> u32;

    /// Fill `frame` (exactly `channels` long) with the next frame.
    fn pull(&mut self, frame: &mut [f32]) -> Pull;
}

/// A track being decoded in the background.
///
/// The decoder thread stops once the file ends or the stream is dropped.
pub struct TrackStream {
    channels: usize,
    sample_rate: u32,
    duration: Option<Duration>,
    consumer: HeapCons<f32>,
    done: Arc<AtomicFlag>,
    cancel: Arc<AtomicFlag>,
}

impl TrackStream {
    /// Open `path` with rodio's decoders (mp3, flac, ogg, wav) and start streaming it.
    ///
    /// Format errors surface here; decode errors later in the file end the track early.
    pub fn open(path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let decoder = Decoder::new(file)?;
        let channels = decoder.channels() as usize;
        let sample_rate = decoder.sample_rate();

        if channels == 0 || sample_rate == 0 {
            return Err(Error::Unsupported {
                path: path.to_path_buf(),
                reason: format!("{channels} channels at {sample_rate} Hz"),
            });
        }

        tracing::debug!(
            "Streaming {}: {} Hz, {} ch",
            path.display(),
            sample_rate,
            channels
        );

        let duration = decoder.total_duration();
        let samples = decoder.map(|s| s as f32 / 32768.0);
        Self::spawn(samples, channels, sample_rate, duration)
    }

    /// Stream already-decoded interleaved samples through the same buffer.
    pub fn spawn<I>(
        samples: I,
        channels: usize,
        sample_rate: u32,
        duration: Option<Duration>,
    ) -> Result<Self>
    where
        I: Iterator<Item = f32> + Send + 'static,
    {
        let channels = channels.max(1);
        let capacity = (sample_rate as usize * channels * BUFFER_SECONDS).max(MIN_BUFFER_SAMPLES);
        let (producer, consumer) = HeapRb::<f32>::new(capacity).split();

        let done = Arc::new(AtomicFlag::new(false));
        let cancel = Arc::new(AtomicFlag::new(false));

        let feeder_done = done.clone();
        let feeder_cancel = cancel.clone();
        thread::Builder::new()
            .name("speedo-decode".into())
            .spawn(move || {
                feed(samples, producer, channels, &feeder_cancel);
                feeder_done.set(true);
            })?;

        let stream = Self {
            channels,
            sample_rate,
            duration,
            consumer,
            done,
            cancel,
        };
        stream.prefill(capacity / 2);
        Ok(stream)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Samples decoded and not yet read.
    pub fn buffered(&self) -> usize {
        self.consumer.occupied_len()
    }

    pub fn capacity(&self) -> usize {
        self.consumer.capacity().get()
    }

    fn prefill(&self, samples: usize) {
        let deadline = Instant::now() + PREFILL_TIMEOUT;
        while !self.done.get() && self.buffered() < samples {
            if Instant::now() >= deadline {
                tracing::debug!("Prefill timed out with {} samples", self.buffered());
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }
}

impl FrameSource for TrackStream {
    fn channels(&self) -> usize {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn pull(&mut self, frame: &mut [f32]) -> Pull {
        // Read `done` first: once set, everything the decoder wrote is visible
        let done = self.done.get();
        if self.consumer.occupied_len() < self.channels {
            return if done { Pull::End } else { Pull::Underrun };
        }
        for sample in frame.iter_mut() {
            *sample = self.consumer.try_pop().unwrap_or(0.0);
        }
        Pull::Frame
    }
}

impl Drop for TrackStream {
    fn drop(&mut self) {
        self.cancel.set(true);
    }
}

/// Decoder thread body. Pushes whole frames only, so the reader never sees half a frame.
fn feed<I>(mut samples: I, mut producer: HeapProd<f32>, channels: usize, cancel: &AtomicFlag)
where
    I: Iterator<Item = f32>,
{
    let mut frame = vec![0.0f32; channels];

    'stream: loop {
        for (filled, slot) in frame.iter_mut().enumerate() {
            match samples.next() {
                Some(sample) => *slot = sample,
                None => {
                    if filled > 0 {
                        tracing::debug!("Dropping {filled} trailing samples");
                    }
                    break 'stream;
                }
            }
        }

        while producer.vacant_len() < channels {
            if cancel.get() {
                break 'stream;
            }
            thread::sleep(FEED_IDLE);
        }
        if cancel.get() {
            break;
        }
        producer.push_slice(&frame);
    }
}
