//! SpeedoEngine wiring hardware, sensor and backend into the refresh loop.

use crate::core::{
    command_channel, shutdown_channel, Backend, LoopExit, Player, Playlist, PulseSensor,
    PulseTracker, SensorKind, SpeedController, SpeedSensor, SpeedoConfig, StatusLine,
    VoltageSensor,
};
use crate::hw::{open_gpio, Ads1x15, ButtonPanel, HallSensor};
use crate::{Error, Result};
use std::io::Write;
use std::sync::Arc;

/// ADS1x15 input the potentiometer is wired to.
const ADC_CHANNEL: u8 = 0;

/// A configured player ready to run.
///
/// [`run`](SpeedoEngine::run) opens GPIO, the sensor and the audio backend,
/// then blocks in the refresh loop until a signal arrives, the playlist
/// ends or the backend stops on its own.
///
/// # Example
///
/// ```ignore
/// use speedo::prelude::*;
///
/// let engine = SpeedoEngine::builder()
///     .config(SpeedoConfig::sink_voltage())
///     .files(std::env::args().skip(1))
///     .build()?;
///
/// let exit = engine.run()?;
/// ```
pub struct SpeedoEngine {
    config: SpeedoConfig,
    playlist: Playlist,
    output_device: Option<usize>,
}

/// Hardware handles that must outlive the loop; dropping them disarms the interrupts.
struct Inputs {
    _buttons: ButtonPanel,
    _hall: Option<HallSensor>,
}

impl SpeedoEngine {
    pub fn builder() -> crate::SpeedoEngineBuilder {
        crate::SpeedoEngineBuilder::default()
    }

    pub(crate) fn from_parts(
        config: SpeedoConfig,
        playlist: Playlist,
        output_device: Option<usize>,
    ) -> Self {
        Self {
            config,
            playlist,
            output_device,
        }
    }

    pub fn config(&self) -> &SpeedoConfig {
        &self.config
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Run to completion, printing a status line on every refresh tick.
    pub fn run(self) -> Result<LoopExit> {
        let mut stdout = std::io::stdout();
        let mut reported = false;
        self.run_with(move |status| {
            let written = write!(stdout, "{status}\r").and_then(|()| stdout.flush());
            if let Err(e) = written {
                if !reported {
                    tracing::debug!("Status line not written: {e}");
                    reported = true;
                }
            }
        })
    }

    /// Run to completion, handing every status line to `on_status`.
    pub fn run_with<F>(self, on_status: F) -> Result<LoopExit>
    where
        F: FnMut(&StatusLine),
    {
        let (commands, rx) = command_channel();
        let (trigger, shutdown) = shutdown_channel();

        ctrlc::set_handler(move || {
            tracing::info!("Signal received, stopping");
            trigger.trigger();
        })?;

        let gpio = open_gpio()?;
        let buttons = ButtonPanel::attach(
            &gpio,
            &self.config.pins,
            self.config.debounce.button(),
            commands,
        )?;

        let (sensor, hall): (Box<dyn SpeedSensor>, Option<HallSensor>) = match self.config.sensor {
            SensorKind::Pulse => {
                let tracker = Arc::new(PulseTracker::new());
                let hall = HallSensor::attach(
                    &gpio,
                    self.config.pins.hall,
                    self.config.debounce.pulse(),
                    tracker.clone(),
                )?;
                let sensor: Box<dyn SpeedSensor> = Box::new(
                    PulseSensor::new(tracker, self.config.pulse, self.config.initial_multiplier)
                        .stall_decay(self.config.stall_decay),
                );
                (sensor, Some(hall))
            }
            SensorKind::Voltage => {
                let adc = Ads1x15::open(self.config.adc, self.config.i2c_address, ADC_CHANNEL)?;
                let sensor: Box<dyn SpeedSensor> =
                    Box::new(VoltageSensor::new(adc, self.config.voltage));
                (sensor, None)
            }
        };
        let _inputs = Inputs {
            _buttons: buttons,
            _hall: hall,
        };

        let player = open_player(self.config.backend, self.output_device)?;
        let mut controller = SpeedController::new(player, sensor, self.playlist, &self.config)
            .with_shutdown(shutdown);

        Ok(controller.run(&rx, on_status)?)
    }
}

fn open_player(backend: Backend, output_device: Option<usize>) -> Result<Box<dyn Player>> {
    match backend {
        #[cfg(feature = "sink")]
        Backend::Sink => {
            if output_device.is_some() {
                tracing::warn!("The sink backend always uses the default output device");
            }
            Ok(Box::new(crate::playback::SinkPlayer::new()?))
        }
        #[cfg(feature = "pipeline")]
        Backend::Pipeline => Ok(Box::new(crate::playback::PipelinePlayer::with_device(
            output_device,
        )?)),
        #[allow(unreachable_patterns)]
        other => {
            let _ = output_device;
            Err(Error::BackendUnavailable(other))
        }
    }
}
