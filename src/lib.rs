//! # speedo - cadence-driven music playback
//!
//! Pedal faster, the music plays faster. A Hall-effect sensor on the crank
//! (or a potentiometer read through an ADC) sets the playback rate of the
//! current track; three buttons play/pause and skip.
//!
//! ## Architecture
//!
//! speedo is an umbrella crate that coordinates:
//! - **speedo-core** - Control law, smoothing, transport, refresh loop
//! - **speedo-hw** - Raspberry Pi GPIO interrupts and ADS1x15 ADC
//! - **speedo-playback** - `rodio` sink and `cpal` pipeline backends
//!
//! ## Quick Start
//!
//! ```ignore
//! use speedo::prelude::*;
//!
//! let engine = SpeedoEngine::builder()
//!     .config(SpeedoConfig::sink_pulse())
//!     .files(["ride.mp3"])
//!     .build()?;
//!
//! engine.run()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Both backends
//! - `sink` - `rodio` backend (mp3, flac, ogg, wav)
//! - `pipeline` - `cpal` backend with streaming rodio decoders (mp3, flac, ogg, wav)

/// Re-export of speedo-core for direct access
pub use speedo_core as core;

/// Re-export of speedo-hw for direct access
pub use speedo_hw as hw;

/// Re-export of speedo-playback for direct access
pub use speedo_playback as playback;

pub use speedo_core::{
    AdcChip, Backend, Cadence, LoopExit, Player, PlayerStatus, Playlist, PulseLaw, RateLimits,
    SensorKind, SpeedController, SpeedSensor, SpeedoConfig, StatusLine, TransportCommand,
    VoltageLaw,
};

#[cfg(feature = "sink")]
pub use speedo_playback::SinkPlayer;

#[cfg(feature = "pipeline")]
pub use speedo_playback::PipelinePlayer;

mod builder;
pub mod cli;
mod engine;
mod error;

pub use builder::SpeedoEngineBuilder;
pub use engine::SpeedoEngine;
pub use error::{Error, Result};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{SpeedoEngine, SpeedoEngineBuilder};

    pub use crate::core::{Backend, SensorKind, SpeedoConfig};
    pub use crate::core::{Player, SpeedSensor};
}
