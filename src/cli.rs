//! Command-line interface and config resolution.
//!
//! Precedence, lowest first: preset for the chosen backend/sensor, the
//! `--config` JSON file, individual flags.

use crate::core::{AdcChip, Backend, SensorKind, SpeedoConfig};
use crate::Result;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "speedo",
    version,
    about = "Play music at the speed you pedal",
    long_about = "Play music at the speed you pedal.\n\n\
        A Hall sensor on GPIO (or a potentiometer on an ADS1x15) sets the \
        playback rate. Buttons on GPIO play/pause and skip tracks."
)]
pub struct Cli {
    /// Audio files to play, in order
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Playback backend: sink or pipeline
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Cadence sensor: pulse or voltage
    #[arg(long)]
    pub sensor: Option<SensorKind>,

    /// ADC board for the voltage sensor: ads1015 or ads1115
    #[arg(long)]
    pub adc: Option<AdcChip>,

    /// Refresh interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub refresh_ms: Option<u64>,

    /// Added to the cadence multiplier before clamping
    #[arg(long, allow_hyphen_values = true, value_name = "OFFSET")]
    pub rate_offset: Option<f64>,

    /// Ramp rate changes over this many milliseconds (0 = immediate)
    #[arg(long, value_name = "MS")]
    pub smoothing_ms: Option<u64>,

    /// Let cadence decay toward zero while no pulses arrive
    #[arg(long)]
    pub stall_decay: bool,

    /// Output device index (pipeline backend)
    #[arg(long, value_name = "INDEX")]
    pub device: Option<usize>,

    /// JSON file overlaid on the preset
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// The keys that pick a preset, peeked from the JSON overlay.
#[derive(Debug, Default, Deserialize)]
struct Selection {
    backend: Option<Backend>,
    sensor: Option<SensorKind>,
    adc: Option<AdcChip>,
}

impl Cli {
    /// Build the effective configuration. Does not validate it.
    pub fn resolve_config(&self) -> Result<SpeedoConfig> {
        let overlay = match &self.config {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => None,
        };
        let selection: Selection = match &overlay {
            Some(json) => serde_json::from_str(json).map_err(crate::core::Error::from)?,
            None => Selection::default(),
        };

        let backend = self.backend.or(selection.backend).unwrap_or_default();
        let sensor = self.sensor.or(selection.sensor).unwrap_or_default();
        let adc = self.adc.or(selection.adc);

        let mut config = SpeedoConfig::preset(backend, sensor);
        if let Some(adc) = adc {
            config = config.with_adc(adc);
        }
        if let Some(json) = &overlay {
            config = config.merge_json(json)?;
        }

        config.backend = backend;
        config.sensor = sensor;
        if let Some(adc) = self.adc {
            config = config.with_adc(adc);
        }
        if let Some(refresh_ms) = self.refresh_ms {
            config.refresh_ms = refresh_ms;
        }
        if let Some(offset) = self.rate_offset {
            config.rate.offset = offset;
        }
        if let Some(smoothing_ms) = self.smoothing_ms {
            config.smoothing_ms = smoothing_ms;
        }
        if self.stall_decay {
            config.stall_decay = true;
        }

        Ok(config)
    }

    /// Default `info`, `debug` with `--verbose`; `RUST_LOG` wins over both.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
