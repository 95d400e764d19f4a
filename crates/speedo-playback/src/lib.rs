//! Playback backends implementing [`speedo_core::Player`].
//!
//! - `sink` (default): [`SinkPlayer`], a `rodio` sink decoding mp3/flac/ogg/wav.
//! - `pipeline` (default): [`PipelinePlayer`], a file streamed through
//!   rodio's decoders and a varispeed resampler into a `cpal` output stream.

mod error;
pub use error::{Error, Result};

#[cfg(feature = "sink")]
mod sink;
#[cfg(feature = "sink")]
pub use sink::SinkPlayer;

#[cfg(feature = "pipeline")]
pub mod pipeline;
#[cfg(feature = "pipeline")]
pub use pipeline::{output_devices, PipelinePlayer};
