//! The refresh loop tying sensor, rate law, transport and player together.
//!
//! [`SpeedController`] exclusively owns the player. Everything that happens
//! asynchronously (button presses, signals) reaches it as a
//! [`TransportCommand`] over a channel; pulse timing reaches it through the
//! lock-free [`PulseTracker`](crate::PulseTracker) inside the sensor. Signal
//! handlers use a separate [`shutdown_channel`](crate::shutdown_channel) so a
//! full command queue cannot hold back a shutdown.
//!
//! Tracks the player refuses to load are skipped with a warning, in the
//! direction the playlist was moving.
//!
//! # Example
//!
//! ```ignore
//! let (commands, rx) = command_channel();
//! let mut controller = SpeedController::new(player, sensor, playlist, &config);
//! let exit = controller.run(&rx, |status| print!("{status}\r"))?;
//! ```

use crate::cadence::{Cadence, RateLimits};
use crate::config::SpeedoConfig;
use crate::display::StatusLine;
use crate::player::{Player, PlayerStatus};
use crate::sensor::SpeedSensor;
use crate::smooth::RateSmoother;
use crate::transport::{
    PlaybackState, Playlist, Step, TransitionResult, TransportCommand, TransportEvent,
    TransportFsm,
};
use crate::{Error, Result};
use crossbeam_channel::{never, select, tick, Receiver};
use std::time::{Duration, Instant};

/// Why [`SpeedController::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Shutdown,
    PlaylistFinished,
    /// The backend went idle without being asked to.
    PlayerStopped,
    /// Every command sender or shutdown trigger was dropped.
    Disconnected,
}

pub struct SpeedController<P, S> {
    player: P,
    sensor: S,
    playlist: Playlist,
    fsm: TransportFsm,
    limits: RateLimits,
    smoother: RateSmoother,
    refresh: Duration,
    cadence: Cadence,
    duration: Option<Duration>,
    shutdown: Receiver<()>,
}

impl<P: Player, S: SpeedSensor> SpeedController<P, S> {
    pub fn new(player: P, sensor: S, playlist: Playlist, config: &SpeedoConfig) -> Self {
        let initial = config.rate.apply(config.initial_multiplier);
        let smoother = if config.smoothing_ms == 0 {
            RateSmoother::immediate(initial)
        } else {
            RateSmoother::new(initial, config.smoothing(), config.refresh_interval())
        };

        Self {
            player,
            sensor,
            playlist,
            fsm: TransportFsm::new(),
            limits: config.rate,
            smoother,
            refresh: config.refresh_interval(),
            cadence: Cadence::from_multiplier(config.initial_multiplier),
            duration: None,
            shutdown: never(),
        }
    }

    /// End [`run`](Self::run) when `shutdown` receives.
    pub fn with_shutdown(mut self, shutdown: Receiver<()>) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> PlaybackState {
        self.fsm.state()
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Rate most recently computed for the player.
    pub fn rate(&self) -> f32 {
        self.smoother.current()
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh
    }

    pub fn status_line(&self) -> StatusLine {
        StatusLine::new(self.playlist.current(), self.cadence, self.rate())
            .with_times(self.player.position(), self.duration)
    }

    /// Load the first playable track and start it at the initial rate.
    pub fn start(&mut self) -> Result<()> {
        if !self.load_from(Step::Next) {
            return Err(Error::EmptyPlaylist(self.playlist.len()));
        }
        self.resume()
    }

    /// One refresh: follow the player's end-of-track, read the sensor, write the rate.
    ///
    /// Returns `Some` when the loop should end. A sensor error leaves the
    /// previous rate in place.
    pub fn tick(&mut self, now: Instant) -> Result<Option<LoopExit>> {
        match self.player.status() {
            PlayerStatus::Finished => {
                if self.playlist.step(Step::Next).is_none() {
                    self.fsm.transition(TransportEvent::TrackFinished);
                    return Ok(Some(LoopExit::PlaylistFinished));
                }
                tracing::info!("Track finished, advancing");
                self.player.stop()?;
                if !self.load_from(Step::Next) {
                    self.fsm.transition(TransportEvent::TrackFinished);
                    return Ok(Some(LoopExit::PlaylistFinished));
                }
                self.resume()?;
            }
            PlayerStatus::Idle if self.fsm.state().is_active() => {
                tracing::warn!("Player stopped unexpectedly");
                self.fsm.transition(TransportEvent::Stop);
                return Ok(Some(LoopExit::PlayerStopped));
            }
            _ => {}
        }

        self.cadence = self.sensor.read(now)?;
        self.smoother.set_target(self.limits.apply(self.cadence.multiplier));
        let rate = self.smoother.next_tick();

        if self.fsm.state() == PlaybackState::Playing {
            self.player.set_speed(rate)?;
        }
        Ok(None)
    }

    /// Apply one transport command.
    pub fn handle(&mut self, command: TransportCommand) -> Result<Option<LoopExit>> {
        match command {
            TransportCommand::PlayPause => {
                tracing::info!("Play / pause pressed");
                match self.fsm.transition(TransportEvent::TogglePause) {
                    TransitionResult::StateChanged(PlaybackState::Paused) => self.player.pause()?,
                    TransitionResult::StateChanged(PlaybackState::Playing) => {
                        self.player.play()?;
                        self.apply_rate()?;
                    }
                    _ => {}
                }
            }
            TransportCommand::Next => self.skip(Step::Next)?,
            TransportCommand::Previous => self.skip(Step::Previous)?,
            TransportCommand::Shutdown => return Ok(Some(LoopExit::Shutdown)),
        }
        Ok(None)
    }

    /// Stop playback. Safe to call more than once.
    pub fn shutdown(&mut self) -> Result<()> {
        self.fsm.transition(TransportEvent::Stop);
        self.player.stop()
    }

    /// Run until shutdown, playlist end, or the player stops on its own.
    ///
    /// `on_status` receives the status line after every successful tick.
    /// Tick and command failures are logged and the loop carries on.
    pub fn run<F>(&mut self, commands: &Receiver<TransportCommand>, mut on_status: F) -> Result<LoopExit>
    where
        F: FnMut(&StatusLine),
    {
        self.start()?;
        let ticker = tick(self.refresh);
        let shutdown = self.shutdown.clone();

        let exit = loop {
            select! {
                recv(shutdown) -> signal => match signal {
                    Ok(()) => break LoopExit::Shutdown,
                    Err(_) => break LoopExit::Disconnected,
                },
                recv(ticker) -> now => {
                    let now = now.unwrap_or_else(|_| Instant::now());
                    match self.tick(now) {
                        Ok(Some(exit)) => break exit,
                        Ok(None) => on_status(&self.status_line()),
                        Err(e) => tracing::warn!("Refresh failed: {e}"),
                    }
                }
                recv(commands) -> command => match command {
                    Ok(command) => match self.handle(command) {
                        Ok(Some(exit)) => break exit,
                        Ok(None) => {}
                        Err(e) => tracing::warn!("{command:?} failed: {e}"),
                    },
                    Err(_) => break LoopExit::Disconnected,
                },
            }
        };

        tracing::info!(?exit, "Refresh loop finished");
        self.shutdown()?;
        Ok(exit)
    }

    fn skip(&mut self, step: Step) -> Result<()> {
        let origin = self.playlist.index();
        if self.playlist.step(step).is_none() {
            match step {
                Step::Next => tracing::info!("No next track"),
                Step::Previous => tracing::info!("No previous track"),
            }
            return Ok(());
        }

        match step {
            Step::Next => tracing::info!("Skipping to next track"),
            Step::Previous => tracing::info!("Skipping to previous track"),
        }
        self.player.stop()?;
        if !self.load_from(step) {
            tracing::warn!("Nothing playable that way, back to the previous track");
            self.playlist.select(origin);
            self.load_current()?;
        }
        self.resume()
    }

    /// Load the current track, stepping past tracks that fail to load.
    ///
    /// Returns `false` when the playlist ran out in that direction.
    fn load_from(&mut self, step: Step) -> bool {
        loop {
            match self.load_current() {
                Ok(()) => return true,
                Err(e) => {
                    tracing::warn!("Skipping {}: {e}", self.playlist.current().display());
                    if self.playlist.step(step).is_none() {
                        return false;
                    }
                }
            }
        }
    }

    fn resume(&mut self) -> Result<()> {
        self.player.play()?;
        self.fsm.transition(TransportEvent::Play);
        self.apply_rate()
    }

    fn load_current(&mut self) -> Result<()> {
        let track = self.playlist.current().to_path_buf();
        tracing::info!("Loading {}", track.display());
        self.duration = None;
        self.player.load(&track)?;
        self.duration = self.player.duration();
        Ok(())
    }

    fn apply_rate(&mut self) -> Result<()> {
        self.player.set_speed(self.smoother.current())
    }
}
