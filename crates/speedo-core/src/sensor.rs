//! Cadence sensors read by the refresh loop.

use crate::cadence::{Cadence, PulseLaw, VoltageLaw};
use crate::pulse::PulseTracker;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;

/// Produces a cadence estimate on each refresh tick.
pub trait SpeedSensor {
    fn read(&mut self, now: Instant) -> Result<Cadence>;
}

impl<S: SpeedSensor + ?Sized> SpeedSensor for Box<S> {
    fn read(&mut self, now: Instant) -> Result<Cadence> {
        (**self).read(now)
    }
}

/// Raw voltage source, e.g. one ADC channel.
pub trait VoltageReader {
    fn read_voltage(&mut self) -> Result<f32>;
}

impl<R: VoltageReader + ?Sized> VoltageReader for Box<R> {
    fn read_voltage(&mut self) -> Result<f32> {
        (**self).read_voltage()
    }
}

/// Cadence from Hall-sensor pulse timing.
pub struct PulseSensor {
    tracker: Arc<PulseTracker>,
    law: PulseLaw,
    initial: Cadence,
    stall_decay: bool,
}

impl PulseSensor {
    pub fn new(tracker: Arc<PulseTracker>, law: PulseLaw, initial_multiplier: f64) -> Self {
        Self {
            tracker,
            law,
            initial: Cadence {
                rpm: Some(0.0),
                multiplier: initial_multiplier,
            },
            stall_decay: false,
        }
    }

    /// While no pulse arrives, treat the time since the last one as the interval.
    pub fn stall_decay(mut self, enabled: bool) -> Self {
        self.stall_decay = enabled;
        self
    }

    pub fn tracker(&self) -> &Arc<PulseTracker> {
        &self.tracker
    }
}

impl SpeedSensor for PulseSensor {
    fn read(&mut self, now: Instant) -> Result<Cadence> {
        let Some(interval) = self.tracker.last_interval() else {
            return Ok(self.initial);
        };

        let elapsed = if self.stall_decay {
            interval.max(self.tracker.since_last_pulse(now))
        } else {
            interval
        };
        self.law.cadence(elapsed)
    }
}

/// Cadence from a potentiometer voltage.
pub struct VoltageSensor<R> {
    reader: R,
    law: VoltageLaw,
}

impl<R: VoltageReader> VoltageSensor<R> {
    pub fn new(reader: R, law: VoltageLaw) -> Self {
        Self { reader, law }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }
}

impl<R: VoltageReader> SpeedSensor for VoltageSensor<R> {
    fn read(&mut self, _now: Instant) -> Result<Cadence> {
        let volts = self.reader.read_voltage()?;
        Ok(self.law.cadence(volts as f64))
    }
}
