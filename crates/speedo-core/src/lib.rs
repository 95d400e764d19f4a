//! Cadence-to-playback-rate control for an exercise bike.
//!
//! # Primary API
//!
//! - [`SpeedController`]: the refresh loop owning a [`Player`]
//! - [`PulseLaw`] / [`VoltageLaw`] / [`RateLimits`]: the control law
//! - [`PulseTracker`]: lock-free pulse timing fed from GPIO interrupts
//! - [`Playlist`], [`TransportFsm`], [`TransportCommand`]: transport
//! - [`SpeedoConfig`]: presets and validation
//!
//! # Example
//!
//! ```ignore
//! use speedo_core::*;
//!
//! let config = SpeedoConfig::sink_pulse();
//! let tracker = Arc::new(PulseTracker::new());
//! let sensor = PulseSensor::new(tracker.clone(), config.pulse, config.initial_multiplier);
//! let playlist = Playlist::from_args(std::env::args().skip(1))?;
//!
//! let (commands, rx) = command_channel();
//! let mut controller = SpeedController::new(player, sensor, playlist, &config);
//! controller.run(&rx, |status| print!("{status}\r"))?;
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod cadence;
pub use cadence::{Cadence, PulseLaw, RateLimits, VoltageLaw, SECONDS_PER_MINUTE};

pub mod config;
pub use config::{AdcChip, Backend, Debounce, PinLayout, SensorKind, SpeedoConfig};

mod controller;
pub use controller::{LoopExit, SpeedController};

mod display;
pub use display::StatusLine;

pub(crate) mod lockfree;
pub use lockfree::{AtomicCounter, AtomicDouble, AtomicFlag, AtomicFloat};

mod player;
pub use player::{Player, PlayerStatus};

mod pulse;
pub use pulse::PulseTracker;

mod sensor;
pub use sensor::{PulseSensor, SpeedSensor, VoltageReader, VoltageSensor};

mod smooth;
pub use smooth::RateSmoother;

pub mod transport;
pub use transport::{
    command_channel, shutdown_channel, CommandSender, PlaybackState, Playlist, ShutdownTrigger,
    Step, TransportCommand, TransportEvent, TransportFsm,
};

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use std::sync::Arc;
