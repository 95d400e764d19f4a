//! Ordered track list with clamped stepping.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<PathBuf>,
    index: usize,
}

impl Playlist {
    pub fn new(tracks: Vec<PathBuf>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(Error::EmptyPlaylist(0));
        }
        Ok(Self { tracks, index: 0 })
    }

    /// Build from command-line arguments.
    ///
    /// Arguments that do not name an existing regular file are skipped.
    /// Kept tracks are stored as absolute paths.
    pub fn from_args<I, P>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut given = 0;
        let mut tracks = Vec::new();

        for arg in args {
            given += 1;
            let path = arg.as_ref();
            if !path.is_file() {
                tracing::warn!("Skipping {}: not a file", path.display());
                continue;
            }
            tracks.push(path.canonicalize()?);
        }

        if tracks.is_empty() {
            return Err(Error::EmptyPlaylist(given));
        }
        Ok(Self { tracks, index: 0 })
    }

    pub fn current(&self) -> &Path {
        &self.tracks[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.tracks.len()
    }

    pub fn tracks(&self) -> &[PathBuf] {
        &self.tracks
    }

    /// Move one track. Returns `None`, leaving the index unchanged, at either end.
    pub fn step(&mut self, step: Step) -> Option<&Path> {
        let index = match step {
            Step::Next if !self.is_last() => self.index + 1,
            Step::Previous if !self.is_first() => self.index - 1,
            _ => return None,
        };
        self.index = index;
        Some(&self.tracks[index])
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.tracks.len() {
            return false;
        }
        self.index = index;
        true
    }
}
