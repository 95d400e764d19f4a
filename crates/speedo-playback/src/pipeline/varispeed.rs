//! Speed stage: variable-rate reading of a streamed track.

use super::decode::{FrameSource, Pull};

/// Slowest rate the reader will advance at.
pub const MIN_SPEED: f64 = 0.01;

/// Fractional read head over a [`FrameSource`].
///
/// Advances `step` source frames per output frame and linearly interpolates
/// between the two frames around the head, so tempo and pitch move together.
/// Only those two frames are held; everything else stays in the source.
#[derive(Debug, Clone)]
pub struct VarispeedReader {
    channels: usize,
    current: Vec<f32>,
    next: Vec<f32>,
    has_current: bool,
    has_next: bool,
    source_done: bool,
    ended: bool,
    /// Index of `current` in source frames.
    index: u64,
    frac: f64,
}

impl VarispeedReader {
    pub fn new(channels: usize) -> Self {
        let channels = channels.max(1);
        Self {
            channels,
            current: vec![0.0; channels],
            next: vec![0.0; channels],
            has_current: false,
            has_next: false,
            source_done: false,
            ended: false,
            index: 0,
            frac: 0.0,
        }
    }

    /// Position in source frames.
    pub fn position(&self) -> f64 {
        self.index as f64 + self.frac
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Source frames consumed per output frame.
    pub fn step(speed: f32, source_rate: u32, output_rate: u32) -> f64 {
        let speed = (speed as f64).abs().max(MIN_SPEED);
        speed * source_rate as f64 / output_rate.max(1) as f64
    }

    /// Fill `out` (interleaved, `out_channels` wide) and return `true` once
    /// the source has run out. Frames past the end, or while the source is
    /// behind, are silent and do not move the head.
    pub fn render<S>(&mut self, source: &mut S, step: f64, out: &mut [f32], out_channels: usize) -> bool
    where
        S: FrameSource + ?Sized,
    {
        let out_channels = out_channels.max(1);

        for frame in out.chunks_mut(out_channels) {
            if !self.fill(source) {
                frame.fill(0.0);
                continue;
            }
            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample = self.mix_channel(ch, out_channels);
            }
            self.frac += step;
        }

        self.ended
    }

    /// Bring `current` up to the head. `false` means there is nothing to play right now.
    fn fill<S>(&mut self, source: &mut S) -> bool
    where
        S: FrameSource + ?Sized,
    {
        if self.ended {
            return false;
        }

        if !self.has_current {
            match source.pull(&mut self.current) {
                Pull::Frame => self.has_current = true,
                Pull::Underrun => return false,
                Pull::End => {
                    self.ended = true;
                    return false;
                }
            }
        }

        while self.frac >= 1.0 {
            if !self.has_next && !self.pull_next(source) {
                if self.source_done {
                    self.ended = true;
                }
                return false;
            }
            std::mem::swap(&mut self.current, &mut self.next);
            self.has_next = false;
            self.index += 1;
            self.frac -= 1.0;
        }

        if !self.has_next {
            self.pull_next(source);
        }
        true
    }

    fn pull_next<S>(&mut self, source: &mut S) -> bool
    where
        S: FrameSource + ?Sized,
    {
        if self.source_done {
            return false;
        }
        match source.pull(&mut self.next) {
            Pull::Frame => {
                self.has_next = true;
                true
            }
            Pull::Underrun => false,
            Pull::End => {
                self.source_done = true;
                false
            }
        }
    }

    /// Conversion stage: map source channels onto the device layout.
    #[inline]
    fn mix_channel(&self, out_ch: usize, out_channels: usize) -> f32 {
        let frac = self.frac as f32;
        let lerp = |ch: usize| {
            let a = self.current[ch];
            let b = if self.has_next { self.next[ch] } else { a };
            a + (b - a) * frac
        };

        if out_channels == 1 && self.channels > 1 {
            // Downmix to mono
            (0..self.channels).map(lerp).sum::<f32>() / self.channels as f32
        } else {
            lerp(out_ch % self.channels)
        }
    }
}
