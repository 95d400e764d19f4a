//! Error types for speedo-playback.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nothing loaded")]
    NothingLoaded,

    #[error("Unsupported file {}: {reason}", path.display())]
    Unsupported { path: PathBuf, reason: String },

    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[cfg(feature = "sink")]
    #[error("Failed to open output stream: {0}")]
    Stream(#[from] rodio::StreamError),

    #[cfg(feature = "sink")]
    #[error("Failed to create sink: {0}")]
    Play(#[from] rodio::PlayError),

    #[cfg(any(feature = "sink", feature = "pipeline"))]
    #[error("Decoder: {0}")]
    Decoder(#[from] rodio::decoder::DecoderError),

    #[cfg(feature = "pipeline")]
    #[error("Audio device not available")]
    DeviceNotAvailable(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "pipeline")]
    #[error("Failed to build audio stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "pipeline")]
    #[error("Failed to play audio stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[cfg(feature = "pipeline")]
    #[error("Failed to enumerate devices")]
    Devices(#[from] cpal::DevicesError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for speedo_core::Error {
    fn from(e: Error) -> Self {
        speedo_core::Error::Player(e.to_string())
    }
}
