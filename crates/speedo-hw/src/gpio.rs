//! Falling-edge GPIO inputs: Hall sensor and transport buttons.
//!
//! Callbacks run on rppal's interrupt threads. They never touch the player:
//! the Hall sensor writes the lock-free [`PulseTracker`], buttons post a
//! [`TransportCommand`].

use crate::Result;
use rppal::gpio::{Event, Gpio, InputPin, Trigger};
use speedo_core::{CommandSender, PinLayout, PulseTracker, TransportCommand};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Pull-up input firing `callback` on each falling edge.
fn falling_edge<C>(gpio: &Gpio, pin: u8, debounce: Duration, callback: C) -> Result<InputPin>
where
    C: FnMut(Event) + Send + 'static,
{
    let mut input = gpio.get(pin)?.into_input_pullup();
    let debounce = (!debounce.is_zero()).then_some(debounce);
    input.set_async_interrupt(Trigger::FallingEdge, debounce, callback)?;
    tracing::debug!("GPIO {} armed (debounce {:?})", pin, debounce);
    Ok(input)
}

/// Hall-effect sensor feeding a [`PulseTracker`].
///
/// Dropping it disarms the interrupt.
pub struct HallSensor {
    _pin: InputPin,
}

impl HallSensor {
    pub fn attach(
        gpio: &Gpio,
        pin: u8,
        debounce: Duration,
        tracker: Arc<PulseTracker>,
    ) -> Result<Self> {
        let pin = falling_edge(gpio, pin, debounce, move |_event| {
            if let Some(interval) = tracker.on_pulse(Instant::now()) {
                tracing::trace!("Pulse after {:?}", interval);
            }
        })?;
        Ok(Self { _pin: pin })
    }
}

/// Play/pause, previous and next buttons.
pub struct ButtonPanel {
    _pins: [InputPin; 3],
}

impl ButtonPanel {
    pub fn attach(
        gpio: &Gpio,
        pins: &PinLayout,
        debounce: Duration,
        commands: CommandSender,
    ) -> Result<Self> {
        let button = |pin: u8, command: TransportCommand| {
            let commands = commands.clone();
            falling_edge(gpio, pin, debounce, move |_event| {
                tracing::debug!("Button {:?}", command);
                commands.send(command);
            })
        };

        Ok(Self {
            _pins: [
                button(pins.play, TransportCommand::PlayPause)?,
                button(pins.prev, TransportCommand::Previous)?,
                button(pins.next, TransportCommand::Next)?,
            ],
        })
    }
}

/// Open the GPIO peripheral.
pub fn open_gpio() -> Result<Gpio> {
    Ok(Gpio::new()?)
}
