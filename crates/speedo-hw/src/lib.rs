//! Raspberry Pi inputs for speedo.
//!
//! - [`HallSensor`]: crank pulses into a [`PulseTracker`](speedo_core::PulseTracker)
//! - [`ButtonPanel`]: play/pause, previous, next as transport commands
//! - [`Ads1x15`]: potentiometer voltage as a [`VoltageReader`](speedo_core::VoltageReader)

mod error;
pub use error::{Error, Result};

pub mod adc;
pub use adc::{Ads1x15, DEFAULT_ADDRESS};

mod gpio;
pub use gpio::{open_gpio, ButtonPanel, HallSensor};

pub use rppal::gpio::Gpio;
