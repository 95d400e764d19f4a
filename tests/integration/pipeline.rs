//! Controller driving the pipeline backend with no audio device attached.
//!
//! Device buffers are pulled by hand through the shared render state, the
//! way the cpal callback would.

use crate::helpers::tolerances::SILENCE_THRESHOLD;
use crate::helpers::*;
use approx::assert_relative_eq;
use speedo::core::testing::ScriptedSensor;
use speedo::core::{LoopExit, Player, PlayerStatus, SpeedController, SpeedoConfig, TransportCommand};
use speedo::PipelinePlayer;
use std::time::Instant;

fn pull(player: &PipelinePlayer, frames: usize) -> Vec<f32> {
    let mut out = vec![0.0; frames * 2];
    player.shared().render(&mut out, 2, TEST_SAMPLE_RATE);
    out
}

#[test]
fn test_rate_reaches_render_position() {
    let tracks = TrackDir::new(1, 8000);
    let mut ctl = SpeedController::new(
        PipelinePlayer::detached(),
        ScriptedSensor::new([pedalling(1750.0)]),
        tracks.playlist(),
        &SpeedoConfig::pipeline_pulse(),
    );
    ctl.start().unwrap();
    ctl.tick(Instant::now()).unwrap();

    // 1.75 + 0.25 offset
    assert_relative_eq!(ctl.rate(), 2.0);

    let out = pull(ctl.player(), 400);
    assert!(out.iter().any(|s| s.abs() > SILENCE_THRESHOLD));
    assert_relative_eq!(
        ctl.player().position().unwrap().as_secs_f64(),
        0.1,
        epsilon = 1e-9
    );
    assert_eq!(ctl.player().duration().unwrap().as_secs(), 1);
}

#[test]
fn test_paused_pipeline_is_silent() {
    let tracks = TrackDir::new(1, 8000);
    let mut ctl = SpeedController::new(
        PipelinePlayer::detached(),
        ScriptedSensor::default(),
        tracks.playlist(),
        &SpeedoConfig::pipeline_pulse(),
    );
    ctl.start().unwrap();
    ctl.handle(TransportCommand::PlayPause).unwrap();

    assert_eq!(ctl.player().status(), PlayerStatus::Paused);
    assert!(pull(ctl.player(), 256).iter().all(|&s| s == 0.0));
}

#[test]
fn test_end_of_track_advances_then_finishes() {
    let tracks = TrackDir::new(2, 64);
    let mut ctl = SpeedController::new(
        PipelinePlayer::detached(),
        ScriptedSensor::constant(pedalling(750.0)),
        tracks.playlist(),
        &SpeedoConfig::pipeline_pulse(),
    );
    ctl.start().unwrap();
    ctl.tick(Instant::now()).unwrap();

    pull(ctl.player(), 256);
    assert_eq!(ctl.player().status(), PlayerStatus::Finished);

    assert_eq!(ctl.tick(Instant::now()).unwrap(), None);
    assert_eq!(ctl.playlist().current(), tracks.track(2));
    assert_eq!(ctl.player().status(), PlayerStatus::Playing);

    pull(ctl.player(), 256);
    assert_eq!(
        ctl.tick(Instant::now()).unwrap(),
        Some(LoopExit::PlaylistFinished)
    );
}

#[test]
fn test_skip_restarts_from_the_top() {
    let tracks = TrackDir::new(2, 8000);
    let mut ctl = SpeedController::new(
        PipelinePlayer::detached(),
        ScriptedSensor::default(),
        tracks.playlist(),
        &SpeedoConfig::pipeline_pulse(),
    );
    ctl.start().unwrap();
    pull(ctl.player(), 1000);
    assert!(ctl.player().position().unwrap().as_secs_f64() > 0.0);

    ctl.handle(TransportCommand::Next).unwrap();
    assert_eq!(ctl.player().position().unwrap().as_secs_f64(), 0.0);
    assert_eq!(ctl.player().status(), PlayerStatus::Playing);
}

#[test]
fn test_skip_passes_over_undecodable_file() {
    let mut tracks = TrackDir::new(2, 8000);
    tracks.insert_undecodable(2, "broken.mp3");
    let mut ctl = SpeedController::new(
        PipelinePlayer::detached(),
        ScriptedSensor::default(),
        tracks.playlist(),
        &SpeedoConfig::pipeline_pulse(),
    );
    ctl.start().unwrap();

    ctl.handle(TransportCommand::Next).unwrap();
    assert_eq!(ctl.tick(Instant::now()).unwrap(), None);
    assert_eq!(ctl.playlist().current(), tracks.track(3));
    assert_eq!(ctl.player().status(), PlayerStatus::Playing);
    assert!(pull(ctl.player(), 64).iter().any(|s| s.abs() > SILENCE_THRESHOLD));
}
