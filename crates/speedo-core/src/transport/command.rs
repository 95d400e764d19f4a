//! Commands delivered from interrupt callbacks and signal handlers.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

pub const COMMAND_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    PlayPause,
    Next,
    Previous,
    Shutdown,
}

/// Cloneable sender handed to callbacks.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<TransportCommand>,
}

impl CommandSender {
    /// Never blocks. Drops the command if the loop is backed up or gone.
    pub fn send(&self, command: TransportCommand) -> bool {
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(cmd)) => {
                tracing::warn!("Command queue full, dropping {:?}", cmd);
                false
            }
            Err(TrySendError::Disconnected(cmd)) => {
                tracing::debug!("Controller gone, dropping {:?}", cmd);
                false
            }
        }
    }
}

pub fn command_channel() -> (CommandSender, Receiver<TransportCommand>) {
    let (tx, rx) = bounded(COMMAND_CAPACITY);
    (CommandSender { tx }, rx)
}

/// Shutdown request kept apart from the command queue, so a backlog of
/// button presses can never swallow it.
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: Sender<()>,
}

impl ShutdownTrigger {
    /// Never blocks. A full slot means a shutdown is already pending.
    pub fn trigger(&self) {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {
                tracing::debug!("Controller gone, shutdown already done");
            }
        }
    }
}

pub fn shutdown_channel() -> (ShutdownTrigger, Receiver<()>) {
    let (tx, rx) = bounded(1);
    (ShutdownTrigger { tx }, rx)
}
