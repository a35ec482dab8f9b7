//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::config::{LogConfig, VisualizerConfig, DEFAULT_CELL_PX};
use crate::render::modes::DrawMode;
use crate::render::theme::{find_theme, DEFAULT_THEME};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pulseviz")]
#[command(about = "Audio-reactive terminal visualizer", long_about = None)]
pub struct Args {
    /// Audio file to play
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Draw mode: bars (default), circular, wave
    #[arg(long, value_name = "MODE", default_value = "bars")]
    pub mode: String,

    /// Color theme: neon, sunset, ocean, forest, ember, rainbow
    #[arg(long, value_name = "THEME", default_value = DEFAULT_THEME)]
    pub theme: String,

    /// Intensity multiplier (defaults to the mode's own value)
    #[arg(long, value_name = "FACTOR")]
    pub sensitivity: Option<f32>,

    /// Playback volume between 0 and 1
    #[arg(long, value_name = "LEVEL", default_value = "0.7")]
    pub volume: f32,

    /// Analyser FFT size, a power of two between 32 and 32768
    #[arg(long, value_name = "POINTS", default_value = "2048")]
    pub fft_size: usize,

    /// Target frame rate
    #[arg(long, value_name = "FPS", default_value = "60")]
    pub fps: u32,

    /// Device pixel ratio applied to the canvas backing store
    #[arg(long, value_name = "RATIO", default_value = "1.0")]
    pub pixel_ratio: f32,

    /// Start playback immediately
    #[arg(long)]
    pub autoplay: bool,

    /// Log level: trace, debug, info, warn, error (RUST_LOG overrides)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log file path
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Parse the draw mode, falling back to bars.
    pub fn parse_mode(&self) -> DrawMode {
        self.mode.parse().unwrap_or_else(|e| {
            warn!("{}, using bars", e);
            DrawMode::Bars
        })
    }

    pub fn visualizer_config(&self) -> VisualizerConfig {
        if find_theme(&self.theme).is_none() {
            warn!("unknown theme '{}', using {}", self.theme, DEFAULT_THEME);
        }
        VisualizerConfig {
            audio_path: self.file.clone(),
            mode: self.parse_mode(),
            theme: self.theme.clone(),
            sensitivity: self.sensitivity,
            volume: self.volume.clamp(0.0, 1.0),
            fft_size: self.fft_size,
            fps: self.fps.max(1),
            pixel_ratio: self.pixel_ratio,
            cell_px: DEFAULT_CELL_PX,
            autoplay: self.autoplay,
        }
    }

    pub fn log_config(&self) -> LogConfig {
        let defaults = LogConfig::default();
        LogConfig {
            level: self.log_level.clone(),
            file: self.log_file.clone().or(defaults.file),
        }
    }
}
