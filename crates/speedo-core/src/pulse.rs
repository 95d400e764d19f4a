//! Pulse timing shared between the Hall-sensor interrupt and the refresh loop.

use crate::lockfree::{AtomicCounter, AtomicDouble};
use std::time::{Duration, Instant};

/// Records Hall-sensor pulses without locking.
///
/// Written from a single interrupt thread, read from the refresh loop.
/// Timestamps are stored as seconds since `origin`, so the first pulse
/// measures its interval from tracker creation.
#[derive(Debug)]
pub struct PulseTracker {
    origin: Instant,
    last_pulse: AtomicDouble,
    interval: AtomicDouble,
    pulses: AtomicCounter,
}

impl PulseTracker {
    pub fn new() -> Self {
        Self::with_origin(Instant::now())
    }

    pub fn with_origin(origin: Instant) -> Self {
        Self {
            origin,
            last_pulse: AtomicDouble::new(0.0),
            interval: AtomicDouble::new(0.0),
            pulses: AtomicCounter::new(),
        }
    }

    /// Returns the interval since the previous pulse, or `None` if it was not positive.
    pub fn on_pulse(&self, now: Instant) -> Option<Duration> {
        let t = self.seconds_at(now);
        let elapsed = t - self.last_pulse.get();
        self.last_pulse.set(t);
        self.pulses.increment();

        if elapsed > 0.0 {
            self.interval.set(elapsed);
            Some(Duration::from_secs_f64(elapsed))
        } else {
            None
        }
    }

    /// Interval between the two most recent pulses.
    pub fn last_interval(&self) -> Option<Duration> {
        let interval = self.interval.get();
        (interval > 0.0).then(|| Duration::from_secs_f64(interval))
    }

    pub fn since_last_pulse(&self, now: Instant) -> Duration {
        let elapsed = self.seconds_at(now) - self.last_pulse.get();
        Duration::from_secs_f64(elapsed.max(0.0))
    }

    pub fn pulse_count(&self) -> u64 {
        self.pulses.get()
    }

    fn seconds_at(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.origin).as_secs_f64()
    }
}

impl Default for PulseTracker {
    fn default() -> Self {
        Self::new()
    }
}
