//! Test doubles for the player and sensor seams.

use crate::cadence::Cadence;
use crate::player::{Player, PlayerStatus};
use crate::sensor::{SpeedSensor, VoltageReader};
use crate::{Error, Result};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    Load(PathBuf),
    Play,
    Pause,
    Stop,
    SetSpeed(f32),
}

/// Player that records every call and lets the test drive its status.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    calls: Vec<PlayerCall>,
    status: PlayerStatus,
    loaded: Option<PathBuf>,
    speed: Option<f32>,
    duration: Option<Duration>,
    rejected: Vec<PathBuf>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Fail `load` for this path, as a backend does for an undecodable file.
    pub fn reject(mut self, track: impl Into<PathBuf>) -> Self {
        self.rejected.push(track.into());
        self
    }

    pub fn calls(&self) -> &[PlayerCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn loaded(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }

    pub fn speed(&self) -> Option<f32> {
        self.speed
    }

    pub fn loads(&self) -> Vec<&Path> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PlayerCall::Load(path) => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }

    /// Simulate end of stream.
    pub fn finish_track(&mut self) {
        self.status = PlayerStatus::Finished;
    }

    /// Simulate the backend stopping on its own.
    pub fn halt(&mut self) {
        self.status = PlayerStatus::Idle;
    }
}

impl Player for RecordingPlayer {
    fn load(&mut self, track: &Path) -> Result<()> {
        self.calls.push(PlayerCall::Load(track.to_path_buf()));
        if self.rejected.iter().any(|rejected| rejected == track) {
            self.loaded = None;
            self.status = PlayerStatus::Idle;
            return Err(Error::Player(format!("cannot decode {}", track.display())));
        }
        self.loaded = Some(track.to_path_buf());
        self.status = PlayerStatus::Idle;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.calls.push(PlayerCall::Play);
        if self.loaded.is_none() {
            return Err(Error::Player("nothing loaded".into()));
        }
        self.status = PlayerStatus::Playing;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.calls.push(PlayerCall::Pause);
        self.status = PlayerStatus::Paused;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.calls.push(PlayerCall::Stop);
        self.status = PlayerStatus::Idle;
        Ok(())
    }

    fn set_speed(&mut self, speed: f32) -> Result<()> {
        self.calls.push(PlayerCall::SetSpeed(speed));
        self.speed = Some(speed);
        Ok(())
    }

    fn status(&self) -> PlayerStatus {
        self.status
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

/// Sensor that replays a script, then repeats its last good reading.
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    script: VecDeque<std::result::Result<Cadence, String>>,
    last: Cadence,
}

impl ScriptedSensor {
    pub fn new(readings: impl IntoIterator<Item = Cadence>) -> Self {
        Self {
            script: readings.into_iter().map(Ok).collect(),
            last: Cadence::default(),
        }
    }

    pub fn constant(cadence: Cadence) -> Self {
        Self {
            script: VecDeque::new(),
            last: cadence,
        }
    }

    pub fn push(&mut self, cadence: Cadence) {
        self.script.push_back(Ok(cadence));
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.script.push_back(Err(message.into()));
    }
}

impl SpeedSensor for ScriptedSensor {
    fn read(&mut self, _now: Instant) -> Result<Cadence> {
        match self.script.pop_front() {
            Some(Ok(cadence)) => {
                self.last = cadence;
                Ok(cadence)
            }
            Some(Err(message)) => Err(Error::Sensor(message)),
            None => Ok(self.last),
        }
    }
}

/// Voltage source returning a fixed sequence of readings.
#[derive(Debug, Default)]
pub struct ScriptedVoltage {
    readings: VecDeque<f32>,
    last: f32,
}

impl ScriptedVoltage {
    pub fn new(readings: impl IntoIterator<Item = f32>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            last: 0.0,
        }
    }
}

impl VoltageReader for ScriptedVoltage {
    fn read_voltage(&mut self) -> Result<f32> {
        if let Some(volts) = self.readings.pop_front() {
            self.last = volts;
        }
        Ok(self.last)
    }
}
