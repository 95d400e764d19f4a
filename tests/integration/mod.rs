//! Integration test modules for speedo

pub mod config;
pub mod controller;
#[cfg(feature = "pipeline")]
pub mod pipeline;
