//! Error types for speedo-core.

use thiserror::Error;

/// Error type for speedo-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No playable files among {0} argument(s)")]
    EmptyPlaylist(usize),

    #[error("Player: {0}")]
    Player(String),

    #[error("Sensor: {0}")]
    Sensor(String),

    #[error("Invalid pulse interval: {0}s")]
    InvalidInterval(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
