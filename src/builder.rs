//! Builder for configuring and constructing a `SpeedoEngine`.

use crate::core::{Playlist, SpeedoConfig};
use crate::{Result, SpeedoEngine};
use std::path::PathBuf;

/// Everything is validated here, before any hardware is opened, so a bad
/// config or an empty playlist fails fast.
///
/// # Example
///
/// ```ignore
/// use speedo::prelude::*;
///
/// let engine = SpeedoEngine::builder()
///     .config(SpeedoConfig::pipeline_pulse())
///     .files(["intro.wav", "climb.wav"])
///     .build()?;
///
/// engine.run()?;
/// ```
#[derive(Default)]
pub struct SpeedoEngineBuilder {
    config: SpeedoConfig,
    files: Vec<PathBuf>,
    output_device: Option<usize>,
}

impl SpeedoEngineBuilder {
    /// Default: [`SpeedoConfig::sink_pulse`]
    pub fn config(mut self, config: SpeedoConfig) -> Self {
        self.config = config;
        self
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Output device index for the pipeline backend. Default: system default.
    pub fn output_device(mut self, index: usize) -> Self {
        self.output_device = Some(index);
        self
    }

    pub fn build(self) -> Result<SpeedoEngine> {
        self.config.validate()?;
        let playlist = Playlist::from_args(&self.files)?;

        tracing::info!(
            backend = ?self.config.backend,
            sensor = ?self.config.sensor,
            tracks = playlist.len(),
            "Engine configured"
        );

        Ok(SpeedoEngine::from_parts(
            self.config,
            playlist,
            self.output_device,
        ))
    }
}
