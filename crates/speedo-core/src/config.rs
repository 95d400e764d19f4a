//! Controller configuration and the presets for each backend/sensor pairing.

use crate::cadence::{PulseLaw, RateLimits, VoltageLaw};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Which playback backend drives the audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Simple media-player abstraction.
    #[default]
    Sink,
    /// Source → decoder → speed → convert → device pipeline.
    Pipeline,
}

/// Which sensor measures cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    /// Hall-effect pulse on a GPIO pin.
    #[default]
    Pulse,
    /// Potentiometer voltage through an ADC.
    Voltage,
}

/// Supported ADC boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdcChip {
    /// 12-bit.
    #[default]
    Ads1015,
    /// 16-bit.
    Ads1115,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sink" => Ok(Self::Sink),
            "pipeline" => Ok(Self::Pipeline),
            other => Err(Error::InvalidConfig(format!(
                "unknown backend '{other}' (expected sink or pipeline)"
            ))),
        }
    }
}

impl FromStr for SensorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pulse" => Ok(Self::Pulse),
            "voltage" => Ok(Self::Voltage),
            other => Err(Error::InvalidConfig(format!(
                "unknown sensor '{other}' (expected pulse or voltage)"
            ))),
        }
    }
}

impl FromStr for AdcChip {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ads1015" => Ok(Self::Ads1015),
            "ads1115" => Ok(Self::Ads1115),
            other => Err(Error::InvalidConfig(format!(
                "unknown ADC '{other}' (expected ads1015 or ads1115)"
            ))),
        }
    }
}

/// BCM pin numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinLayout {
    pub hall: u8,
    pub play: u8,
    pub prev: u8,
    pub next: u8,
}

impl Default for PinLayout {
    fn default() -> Self {
        Self {
            hall: 17,
            play: 25,
            prev: 23,
            next: 12,
        }
    }
}

/// Debounce windows applied by the GPIO interrupt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debounce {
    pub pulse_ms: u64,
    pub button_ms: u64,
}

impl Default for Debounce {
    fn default() -> Self {
        Self {
            pulse_ms: 20,
            button_ms: 500,
        }
    }
}

impl Debounce {
    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    pub fn button(&self) -> Duration {
        Duration::from_millis(self.button_ms)
    }
}

/// Full controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedoConfig {
    pub backend: Backend,
    pub sensor: SensorKind,
    pub adc: AdcChip,
    pub i2c_address: u16,
    pub refresh_ms: u64,
    pub pulse: PulseLaw,
    pub voltage: VoltageLaw,
    /// Multiplier used until the sensor produces its first reading.
    pub initial_multiplier: f64,
    pub rate: RateLimits,
    /// Ramp time for rate changes; 0 applies each reading immediately.
    pub smoothing_ms: u64,
    /// Let cadence decay while no pulses arrive.
    pub stall_decay: bool,
    pub pins: PinLayout,
    pub debounce: Debounce,
}

impl Default for SpeedoConfig {
    fn default() -> Self {
        Self::preset(Backend::default(), SensorKind::default())
    }
}

pub const MIN_REFRESH_MS: u64 = 10;
pub const MAX_REFRESH_MS: u64 = 5000;

impl SpeedoConfig {
    /// Constants for a backend/sensor pairing.
    pub fn preset(backend: Backend, sensor: SensorKind) -> Self {
        let (refresh_ms, button_ms, initial_multiplier, adc) = match backend {
            Backend::Sink => (250, 500, 2.0, AdcChip::Ads1015),
            Backend::Pipeline => (150, 200, 0.25, AdcChip::Ads1115),
        };

        // The voltage law carries its own offset
        let offset = match sensor {
            SensorKind::Pulse => 0.25,
            SensorKind::Voltage => 0.0,
        };

        Self {
            backend,
            sensor,
            adc,
            i2c_address: 0x48,
            refresh_ms,
            pulse: PulseLaw::default(),
            voltage: VoltageLaw::for_chip(adc),
            initial_multiplier,
            rate: RateLimits {
                offset,
                ..RateLimits::default()
            },
            smoothing_ms: 0,
            stall_decay: false,
            pins: PinLayout::default(),
            debounce: Debounce {
                pulse_ms: 20,
                button_ms,
            },
        }
    }

    pub fn sink_pulse() -> Self {
        Self::preset(Backend::Sink, SensorKind::Pulse)
    }

    pub fn pipeline_pulse() -> Self {
        Self::preset(Backend::Pipeline, SensorKind::Pulse)
    }

    pub fn sink_voltage() -> Self {
        Self::preset(Backend::Sink, SensorKind::Voltage)
    }

    pub fn pipeline_voltage() -> Self {
        Self::preset(Backend::Pipeline, SensorKind::Voltage)
    }

    /// Switch ADC board and its calibration.
    pub fn with_adc(mut self, adc: AdcChip) -> Self {
        self.adc = adc;
        self.voltage = VoltageLaw::for_chip(adc);
        self
    }

    /// Overlay a JSON document onto this config. Keys absent from the
    /// document keep their current values.
    pub fn merge_json(self, json: &str) -> Result<Self> {
        let overlay: serde_json::Value = serde_json::from_str(json)?;
        let mut base = serde_json::to_value(&self)?;
        merge_values(&mut base, overlay);
        Ok(serde_json::from_value(base)?)
    }

    pub fn merge_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        self.merge_json(&json)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn smoothing(&self) -> Duration {
        Duration::from_millis(self.smoothing_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_REFRESH_MS..=MAX_REFRESH_MS).contains(&self.refresh_ms) {
            return Err(Error::InvalidConfig(format!(
                "refresh_ms {} out of range ({MIN_REFRESH_MS}-{MAX_REFRESH_MS})",
                self.refresh_ms
            )));
        }
        if !self.initial_multiplier.is_finite() {
            return Err(Error::InvalidConfig(
                "initial_multiplier must be finite".into(),
            ));
        }
        self.pulse.validate()?;
        self.voltage.validate()?;
        self.rate.validate()
    }
}

fn merge_values(base: &mut serde_json::Value, overlay: serde_json::Value) {
    use serde_json::Value;

    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SpeedoConfig::default();
        assert_eq!(config, SpeedoConfig::sink_pulse());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        for config in [
            SpeedoConfig::sink_pulse(),
            SpeedoConfig::pipeline_pulse(),
            SpeedoConfig::sink_voltage(),
            SpeedoConfig::pipeline_voltage(),
        ] {
            assert!(config.validate().is_ok(), "{config:?}");
        }
    }

    #[test]
    fn test_sink_pulse_constants() {
        let config = SpeedoConfig::sink_pulse();
        assert_eq!(config.refresh_interval(), Duration::from_millis(250));
        assert_eq!(config.initial_multiplier, 2.0);
        assert_eq!(config.rate.offset, 0.25);
        assert_eq!(config.debounce.button(), Duration::from_millis(500));
        assert_eq!(config.debounce.pulse(), Duration::from_millis(20));
    }

    #[test]
    fn test_pipeline_voltage_constants() {
        let config = SpeedoConfig::pipeline_voltage();
        assert_eq!(config.refresh_interval(), Duration::from_millis(150));
        assert_eq!(config.adc, AdcChip::Ads1115);
        assert_eq!(config.voltage.reference_volts, 3.32);
        assert_eq!(config.voltage.offset, 0.5);
        assert_eq!(config.rate.offset, 0.0);
        assert_eq!(config.debounce.button_ms, 200);
    }

    #[test]
    fn test_with_adc_recalibrates() {
        let config = SpeedoConfig::pipeline_voltage().with_adc(AdcChip::Ads1015);
        assert_eq!(config.voltage, VoltageLaw::for_chip(AdcChip::Ads1015));
    }

    #[test]
    fn test_refresh_out_of_range() {
        let config = SpeedoConfig {
            refresh_ms: 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_merge_json_partial() {
        let config = SpeedoConfig::sink_pulse()
            .merge_json(r#"{ "refresh_ms": 100, "rate": { "max_rate": 3.0 }, "pins": { "hall": 4 } }"#)
            .unwrap();

        assert_eq!(config.refresh_ms, 100);
        assert_eq!(config.rate.max_rate, 3.0);
        assert_eq!(config.rate.offset, 0.25);
        assert_eq!(config.pins.hall, 4);
        assert_eq!(config.pins.play, 25);
    }

    #[test]
    fn test_merge_json_rejects_bad_enum() {
        let result = SpeedoConfig::default().merge_json(r#"{ "backend": "gstreamer" }"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_merge_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sensor": "voltage", "smoothing_ms": 500 }}"#).unwrap();

        let config = SpeedoConfig::default().merge_file(file.path()).unwrap();
        assert_eq!(config.sensor, SensorKind::Voltage);
        assert_eq!(config.smoothing(), Duration::from_millis(500));
    }

    #[test]
    fn test_parse_selectors() {
        assert_eq!("pipeline".parse::<Backend>().unwrap(), Backend::Pipeline);
        assert_eq!("Voltage".parse::<SensorKind>().unwrap(), SensorKind::Voltage);
        assert_eq!("ads1115".parse::<AdcChip>().unwrap(), AdcChip::Ads1115);
        assert!("vlc".parse::<Backend>().is_err());
    }
}
