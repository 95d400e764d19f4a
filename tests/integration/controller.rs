//! Refresh loop driven end-to-end through the umbrella crate.
//!
//! Pulses arrive from another thread the way GPIO interrupts do; commands
//! arrive over the same channel the buttons and signal handler use.

use crate::helpers::tolerances::{CADENCE_EPSILON, RATE_EPSILON};
use crate::helpers::*;
use approx::assert_relative_eq;
use speedo::core::testing::{PlayerCall, RecordingPlayer, ScriptedSensor, ScriptedVoltage};
use speedo::core::{
    command_channel, AdcChip, LoopExit, PlaybackState, PulseSensor, PulseTracker,
    SpeedController, SpeedoConfig, TransportCommand, VoltageLaw, VoltageSensor,
};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn fast(config: SpeedoConfig) -> SpeedoConfig {
    SpeedoConfig {
        refresh_ms: 10,
        ..config
    }
}

/// 0.5 s between pulses is 120 rpm, multiplier 0.12, rate 0.37.
#[test]
fn test_pulse_interrupts_drive_rate() {
    let tracks = TrackDir::new(1, 100);
    let origin = Instant::now();
    let tracker = Arc::new(PulseTracker::with_origin(origin));

    let interrupts = {
        let tracker = tracker.clone();
        thread::spawn(move || {
            tracker.on_pulse(origin + Duration::from_secs(1));
            tracker.on_pulse(origin + Duration::from_millis(1500));
        })
    };
    interrupts.join().unwrap();

    let config = SpeedoConfig::sink_pulse();
    let sensor = PulseSensor::new(tracker, config.pulse, config.initial_multiplier);
    let mut ctl = SpeedController::new(RecordingPlayer::new(), sensor, tracks.playlist(), &config);

    ctl.start().unwrap();
    ctl.tick(origin + Duration::from_millis(1600)).unwrap();

    assert_relative_eq!(ctl.cadence().rpm.unwrap(), 120.0, epsilon = 1e-6);
    assert_relative_eq!(ctl.cadence().multiplier, 0.12, epsilon = CADENCE_EPSILON);
    assert_relative_eq!(ctl.player().speed().unwrap(), 0.37, epsilon = RATE_EPSILON);
}

#[test]
fn test_initial_multiplier_before_first_pulse() {
    let tracks = TrackDir::new(1, 100);
    let config = SpeedoConfig::pipeline_pulse();
    let sensor = PulseSensor::new(
        Arc::new(PulseTracker::new()),
        config.pulse,
        config.initial_multiplier,
    );
    let mut ctl = SpeedController::new(RecordingPlayer::new(), sensor, tracks.playlist(), &config);

    ctl.start().unwrap();
    ctl.tick(Instant::now()).unwrap();

    // 0.25 initial + 0.25 offset
    assert_relative_eq!(ctl.player().speed().unwrap(), 0.5, epsilon = RATE_EPSILON);
}

#[test]
fn test_voltage_sensor_drives_rate() {
    let tracks = TrackDir::new(1, 100);
    let config = SpeedoConfig::sink_voltage();
    let sensor = VoltageSensor::new(
        ScriptedVoltage::new([2.045, 0.0]),
        VoltageLaw::for_chip(AdcChip::Ads1015),
    );
    let mut ctl = SpeedController::new(RecordingPlayer::new(), sensor, tracks.playlist(), &config);
    ctl.start().unwrap();

    ctl.tick(Instant::now()).unwrap();
    assert_relative_eq!(ctl.player().speed().unwrap(), 0.75, epsilon = 1e-5);

    // Potentiometer at zero leaves only the law's offset
    ctl.tick(Instant::now()).unwrap();
    assert_relative_eq!(ctl.player().speed().unwrap(), 0.25, epsilon = 1e-5);
}

#[test]
fn test_rate_is_clamped() {
    let tracks = TrackDir::new(1, 100);
    let sensor = ScriptedSensor::new([pedalling(50_000.0)]);
    let mut ctl = SpeedController::new(
        RecordingPlayer::new(),
        sensor,
        tracks.playlist(),
        &SpeedoConfig::sink_pulse(),
    );
    ctl.start().unwrap();
    ctl.tick(Instant::now()).unwrap();

    assert_eq!(ctl.player().speed(), Some(10.0));
}

#[test]
fn test_skips_clamp_at_both_ends() {
    let tracks = TrackDir::new(2, 100);
    let mut ctl = SpeedController::new(
        RecordingPlayer::new(),
        ScriptedSensor::default(),
        tracks.playlist(),
        &SpeedoConfig::sink_pulse(),
    );
    ctl.start().unwrap();

    ctl.handle(TransportCommand::Previous).unwrap();
    ctl.handle(TransportCommand::Next).unwrap();
    ctl.handle(TransportCommand::Next).unwrap();
    ctl.handle(TransportCommand::Next).unwrap();

    assert_eq!(
        ctl.player().loads(),
        vec![tracks.track(1), tracks.track(2)]
    );
    assert_eq!(ctl.playlist().index(), 1);
}

#[test]
fn test_run_loop_with_button_thread() {
    let tracks = TrackDir::new(3, 100);
    let (commands, rx) = command_channel();
    let mut ctl = SpeedController::new(
        RecordingPlayer::new(),
        ScriptedSensor::constant(pedalling(500.0)),
        tracks.playlist(),
        &fast(SpeedoConfig::sink_pulse()),
    );

    let buttons = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        commands.send(TransportCommand::Next);
        commands.send(TransportCommand::PlayPause);
        thread::sleep(Duration::from_millis(30));
        commands.send(TransportCommand::Shutdown);
    });

    let mut lines = Vec::new();
    let exit = ctl.run(&rx, |status| lines.push(status.to_string())).unwrap();
    buttons.join().unwrap();

    assert_eq!(exit, LoopExit::Shutdown);
    assert_eq!(ctl.state(), PlaybackState::Stopped);
    assert_eq!(ctl.player().loads(), vec![tracks.track(1), tracks.track(2)]);
    assert!(ctl.player().calls().contains(&PlayerCall::Pause));
    assert_eq!(ctl.player().calls().last(), Some(&PlayerCall::Stop));

    assert!(!lines.is_empty());
    assert!(lines.iter().all(|line| line.contains("track")));
}

#[test]
fn test_run_stops_when_player_halts() {
    let tracks = TrackDir::new(1, 100);
    let (_commands, rx) = command_channel();
    let mut ctl = SpeedController::new(
        RecordingPlayer::new(),
        ScriptedSensor::default(),
        tracks.playlist(),
        &fast(SpeedoConfig::sink_pulse()),
    );

    ctl.start().unwrap();
    ctl.player_mut().halt();
    assert_eq!(ctl.tick(Instant::now()).unwrap(), Some(LoopExit::PlayerStopped));
}
