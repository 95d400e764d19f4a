//! Cadence estimation and the cadence-to-playback-rate control law.
//!
//! Two estimators feed the same rate law:
//!
//! - [`PulseLaw`]: one Hall-effect pulse per crank revolution,
//!   `rpm = 60 / elapsed`, `multiplier = rpm / rpm_scale`.
//! - [`VoltageLaw`]: a potentiometer on an ADC,
//!   `multiplier = volts / reference + offset`.
//!
//! [`RateLimits`] then turns a multiplier into the rate written to the player.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use speedo_core::{PulseLaw, RateLimits};
//!
//! let cadence = PulseLaw::default().cadence(Duration::from_millis(500)).unwrap();
//! assert_eq!(cadence.rpm, Some(120.0));
//!
//! let rate = RateLimits::default().apply(cadence.multiplier);
//! assert!((rate - 0.37).abs() < 1e-6);
//! ```

use crate::config::AdcChip;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// A single cadence estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cadence {
    /// Crank rotations per minute. `None` when the sensor cannot measure it.
    pub rpm: Option<f64>,
    pub multiplier: f64,
}

impl Cadence {
    pub fn from_multiplier(multiplier: f64) -> Self {
        Self {
            rpm: None,
            multiplier,
        }
    }

    /// Percentage shown on the status line.
    pub fn percent(&self) -> f64 {
        self.multiplier * 100.0
    }
}

/// Pulse-interval control law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseLaw {
    /// RPM that maps to a multiplier of 1.0.
    pub rpm_scale: f64,
}

impl Default for PulseLaw {
    fn default() -> Self {
        Self { rpm_scale: 1000.0 }
    }
}

impl PulseLaw {
    /// Rotations per minute for one revolution taking `elapsed`.
    ///
    /// Returns `None` for zero or non-finite intervals.
    pub fn rpm(elapsed: Duration) -> Option<f64> {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 && secs.is_finite() {
            Some(SECONDS_PER_MINUTE / secs)
        } else {
            None
        }
    }

    #[inline]
    pub fn multiplier(&self, rpm: f64) -> f64 {
        rpm / self.rpm_scale
    }

    pub fn cadence(&self, elapsed: Duration) -> Result<Cadence> {
        let rpm = Self::rpm(elapsed).ok_or(Error::InvalidInterval(elapsed.as_secs_f64()))?;
        Ok(Cadence {
            rpm: Some(rpm),
            multiplier: self.multiplier(rpm),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.rpm_scale > 0.0 && self.rpm_scale.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "rpm_scale {} must be positive",
                self.rpm_scale
            )));
        }
        Ok(())
    }
}

/// Voltage control law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageLaw {
    /// Voltage that adds 1.0 to the multiplier.
    pub reference_volts: f64,
    pub offset: f64,
}

impl Default for VoltageLaw {
    fn default() -> Self {
        Self::for_chip(AdcChip::default())
    }
}

impl VoltageLaw {
    /// Calibration used with each ADC board.
    pub fn for_chip(chip: AdcChip) -> Self {
        match chip {
            AdcChip::Ads1015 => Self {
                reference_volts: 4.09,
                offset: 0.25,
            },
            AdcChip::Ads1115 => Self {
                reference_volts: 3.32,
                offset: 0.5,
            },
        }
    }

    #[inline]
    pub fn multiplier(&self, volts: f64) -> f64 {
        volts / self.reference_volts + self.offset
    }

    pub fn cadence(&self, volts: f64) -> Cadence {
        Cadence::from_multiplier(self.multiplier(volts))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.reference_volts > 0.0 && self.reference_volts.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "reference_volts {} must be positive",
                self.reference_volts
            )));
        }
        Ok(())
    }
}

/// Offset and clamp applied to a multiplier before it reaches the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimits {
    pub offset: f64,
    pub min_rate: f64,
    pub max_rate: f64,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            offset: 0.25,
            min_rate: 0.01,
            max_rate: 10.0,
        }
    }
}

impl RateLimits {
    /// `multiplier + offset`, clamped. Non-finite input yields `min_rate`.
    pub fn apply(&self, multiplier: f64) -> f32 {
        let rate = multiplier + self.offset;
        if !rate.is_finite() {
            return self.min_rate as f32;
        }
        rate.clamp(self.min_rate, self.max_rate) as f32
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_rate > 0.0 && self.min_rate <= self.max_rate) {
            return Err(Error::InvalidConfig(format!(
                "rate range {}..={} must satisfy 0 < min <= max",
                self.min_rate, self.max_rate
            )));
        }
        if !self.offset.is_finite() {
            return Err(Error::InvalidConfig("rate offset must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_half_second_interval() {
        let cadence = PulseLaw::default()
            .cadence(Duration::from_millis(500))
            .unwrap();
        assert_relative_eq!(cadence.rpm.unwrap(), 120.0);
        assert_relative_eq!(cadence.multiplier, 0.12);
    }

    #[test]
    fn test_one_second_interval() {
        let cadence = PulseLaw::default().cadence(Duration::from_secs(1)).unwrap();
        assert_relative_eq!(cadence.rpm.unwrap(), 60.0);
        assert_relative_eq!(cadence.multiplier, 0.06);
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(PulseLaw::rpm(Duration::ZERO).is_none());
        assert!(matches!(
            PulseLaw::default().cadence(Duration::ZERO),
            Err(Error::InvalidInterval(_))
        ));
    }

    #[test]
    fn test_voltage_ads1015() {
        let law = VoltageLaw::for_chip(AdcChip::Ads1015);
        assert_relative_eq!(law.multiplier(4.09), 1.25);
        assert_relative_eq!(law.multiplier(0.0), 0.25);
        assert!(law.cadence(2.0).rpm.is_none());
    }

    #[test]
    fn test_voltage_ads1115() {
        let law = VoltageLaw::for_chip(AdcChip::Ads1115);
        assert_relative_eq!(law.multiplier(3.32), 1.5);
        assert_relative_eq!(law.multiplier(1.66), 1.0);
    }

    #[test]
    fn test_rate_offset_and_clamp() {
        let limits = RateLimits::default();
        assert_relative_eq!(limits.apply(0.12), 0.37, epsilon = 1e-6);
        assert_relative_eq!(limits.apply(500.0), 10.0);
        assert_relative_eq!(limits.apply(-5.0), 0.01);
        assert_relative_eq!(limits.apply(f64::NAN), 0.01);
    }

    #[test]
    fn test_invalid_limits() {
        let limits = RateLimits {
            min_rate: 2.0,
            max_rate: 1.0,
            ..Default::default()
        };
        assert!(limits.validate().is_err());
        assert!(RateLimits::default().validate().is_ok());
    }

    proptest! {
        #[test]
        fn faster_pedalling_never_slows_playback(a in 50u64..5000, b in 50u64..5000) {
            let law = PulseLaw::default();
            let (short, long) = if a <= b { (a, b) } else { (b, a) };
            let fast = law.cadence(Duration::from_millis(short)).unwrap();
            let slow = law.cadence(Duration::from_millis(long)).unwrap();
            prop_assert!(fast.multiplier >= slow.multiplier);
        }

        #[test]
        fn applied_rate_stays_in_range(m in -1000.0f64..1000.0) {
            let limits = RateLimits::default();
            let rate = limits.apply(m) as f64;
            prop_assert!(rate >= limits.min_rate - 1e-6 && rate <= limits.max_rate + 1e-6);
        }
    }
}
