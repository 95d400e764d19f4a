//! Centralized error type for the speedo umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use speedo_core::Backend;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] speedo_core::Error),

    #[error("Hardware: {0}")]
    Hardware(#[from] speedo_hw::Error),

    #[error("Playback: {0}")]
    Playback(#[from] speedo_playback::Error),

    #[error("Backend {0:?} was not compiled in")]
    BackendUnavailable(Backend),

    #[error("Signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
