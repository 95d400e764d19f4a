//! Integration tests for speedo
//!
//! Test categories:
//! - controller: refresh loop, commands, sensors, auto-advance
//! - pipeline: controller driving the pipeline backend on WAV fixtures
//! - config: presets and JSON overlays through the engine builder
//!
//! Run with:
//! ```bash
//! cargo test -p speedo --test integration_tests
//! ```

mod helpers;
mod integration;

pub use integration::*;
