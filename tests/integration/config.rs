//! Presets and JSON overlays reaching the engine builder.

use crate::helpers::*;
use speedo::core::{AdcChip, Backend, Error as CoreError, SensorKind};
use speedo::prelude::*;
use speedo::Error;
use std::io::Write;

#[test]
fn test_presets_match_deployments() {
    let sink = SpeedoConfig::sink_pulse();
    assert_eq!(sink.refresh_ms, 250);
    assert_eq!(sink.debounce.button_ms, 500);
    assert_eq!(sink.debounce.pulse_ms, 20);
    assert_eq!(sink.initial_multiplier, 2.0);
    assert_eq!(sink.rate.offset, 0.25);

    let pipeline = SpeedoConfig::pipeline_pulse();
    assert_eq!(pipeline.refresh_ms, 150);
    assert_eq!(pipeline.debounce.button_ms, 200);
    assert_eq!(pipeline.initial_multiplier, 0.25);

    let voltage = SpeedoConfig::pipeline_voltage();
    assert_eq!(voltage.adc, AdcChip::Ads1115);
    assert_eq!(voltage.rate.offset, 0.0);
    assert_eq!(voltage.i2c_address, 0x48);

    for config in [sink, pipeline, voltage, SpeedoConfig::sink_voltage()] {
        config.validate().unwrap();
    }
}

#[test]
fn test_builder_accepts_overlaid_config() {
    let tracks = TrackDir::new(2, 10);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "backend": "pipeline", "sensor": "voltage", "stall_decay": true }}"#).unwrap();

    let config = SpeedoConfig::default().merge_file(file.path()).unwrap();
    let engine = SpeedoEngine::builder()
        .config(config)
        .files(&tracks.tracks)
        .build()
        .unwrap();

    assert_eq!(engine.config().backend, Backend::Pipeline);
    assert_eq!(engine.config().sensor, SensorKind::Voltage);
    assert!(engine.config().stall_decay);
    assert_eq!(engine.playlist().len(), 2);
}

#[test]
fn test_builder_rejects_empty_playlist() {
    let dir = tempfile::tempdir().unwrap();
    let result = SpeedoEngine::builder()
        .file(dir.path().join("nothing.mp3"))
        .build();

    assert!(matches!(result, Err(Error::Core(CoreError::EmptyPlaylist(1)))));
}

#[test]
fn test_builder_rejects_inverted_limits() {
    let tracks = TrackDir::new(1, 10);
    let mut config = SpeedoConfig::sink_pulse();
    config.rate.min_rate = 5.0;
    config.rate.max_rate = 1.0;

    let result = SpeedoEngine::builder()
        .config(config)
        .files(&tracks.tracks)
        .build();
    assert!(matches!(result, Err(Error::Core(CoreError::InvalidConfig(_)))));
}
