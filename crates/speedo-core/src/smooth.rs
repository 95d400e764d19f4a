//! Per-tick smoothing of the applied playback rate.
//!
//! The refresh loop retargets the smoother from each sensor reading and
//! calls [`RateSmoother::next_tick`] once per refresh, so a jumpy cadence
//! estimate becomes a linear ramp instead of audible speed steps.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use speedo_core::RateSmoother;
//!
//! // 1s ramp with a 250ms refresh interval = 4 ticks
//! let mut rate = RateSmoother::new(1.0, Duration::from_secs(1), Duration::from_millis(250));
//! rate.set_target(2.0);
//! assert_eq!(rate.next_tick(), 1.25);
//! ```

use std::time::Duration;

/// Linear ramp toward a target, advanced once per refresh tick.
#[derive(Debug, Clone)]
pub struct RateSmoother {
    current: f32,
    target: f32,
    step: f32,
    ticks_remaining: u32,
    smooth_ticks: u32,
}

impl RateSmoother {
    pub fn new(initial: f32, smooth_time: Duration, tick: Duration) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            ticks_remaining: 0,
            smooth_ticks: ticks_for(smooth_time, tick),
        }
    }

    /// No ramp: every target takes effect on the next tick.
    pub fn immediate(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            ticks_remaining: 0,
            smooth_ticks: 1,
        }
    }

    #[inline]
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() < f32::EPSILON {
            return;
        }

        self.target = target;
        self.ticks_remaining = self.smooth_ticks;
        self.step = (self.target - self.current) / self.ticks_remaining as f32;
    }

    /// Call once per refresh tick.
    #[inline]
    pub fn next_tick(&mut self) -> f32 {
        if self.ticks_remaining > 0 {
            self.current += self.step;
            self.ticks_remaining -= 1;

            // Snap to target to avoid drift
            if self.ticks_remaining == 0 {
                self.current = self.target;
            }
        }

        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }
}

fn ticks_for(smooth_time: Duration, tick: Duration) -> u32 {
    if tick.is_zero() {
        return 1;
    }
    (smooth_time.as_secs_f64() / tick.as_secs_f64()).ceil().max(1.0) as u32
}
