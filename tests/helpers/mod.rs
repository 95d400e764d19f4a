//! Test helpers and fixtures for speedo integration tests
//!
//! Tracks are written as small WAV files in a temp dir; the controller is
//! driven with the recording player and scripted sensors from
//! `speedo_core::testing`, or with a detached pipeline player.

#![allow(dead_code)]

pub mod tolerances;

use hound::{SampleFormat, WavSpec, WavWriter};
use speedo::core::{Cadence, Playlist};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Sample rate of generated fixtures.
pub const TEST_SAMPLE_RATE: u32 = 8000;

/// Write a mono 16-bit square wave of `frames` frames.
pub fn write_wav(path: &Path, frames: usize) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: TEST_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("Failed to create WAV fixture");
    for i in 0..frames {
        let sample = if (i / 8) % 2 == 0 { 8192i16 } else { -8192 };
        writer.write_sample(sample).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV fixture");
}

/// A temp dir holding `count` tracks named `track1.wav`, `track2.wav`, ...
pub struct TrackDir {
    pub dir: TempDir,
    pub tracks: Vec<PathBuf>,
}

impl TrackDir {
    pub fn new(count: usize, frames: usize) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let tracks = (1..=count)
            .map(|i| {
                let path = dir.path().join(format!("track{i}.wav"));
                write_wav(&path, frames);
                path.canonicalize().expect("Failed to canonicalize")
            })
            .collect();
        Self { dir, tracks }
    }

    pub fn playlist(&self) -> Playlist {
        Playlist::from_args(&self.tracks).expect("Failed to build playlist")
    }

    pub fn track(&self, n: usize) -> &Path {
        &self.tracks[n - 1]
    }

    /// Add a file no decoder accepts, inserted before track `before`.
    pub fn insert_undecodable(&mut self, before: usize, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"not audio at all").expect("Failed to write fixture");
        let path = path.canonicalize().expect("Failed to canonicalize");
        self.tracks.insert(before - 1, path.clone());
        path
    }
}

/// Cadence as the pulse law would report it.
pub fn pedalling(rpm: f64) -> Cadence {
    Cadence {
        rpm: Some(rpm),
        multiplier: rpm / 1000.0,
    }
}
