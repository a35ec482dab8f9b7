//! pulseviz - an audio-reactive terminal visualizer.
//!
//! This library provides the analysis driver, signal shaping, color themes
//! and render pipeline behind the `pulseviz` binary.

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod render;
pub mod ui;

pub use error::{Result, VizError};
