//! Tolerance constants for rate and timing assertions.

/// Rates go through f32 on the way to the player.
pub const RATE_EPSILON: f32 = 1e-6;

/// Cadence arithmetic in f64.
pub const CADENCE_EPSILON: f64 = 1e-9;

/// Values below this are considered silent.
pub const SILENCE_THRESHOLD: f32 = 0.0001;
