//! Runtime configuration for the visualizer and logging.

use std::path::PathBuf;

use tracing::Level;

use crate::audio::DEFAULT_FFT_SIZE;
use crate::render::modes::DrawMode;
use crate::render::pipeline::DEFAULT_VOLUME;
use crate::render::theme::DEFAULT_THEME;

/// Terminal cells are mapped to this many canvas pixels.
pub const DEFAULT_CELL_PX: (u16, u16) = (4, 8);

/// Settings for one visualizer session.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizerConfig {
    /// Track to load at startup
    pub audio_path: Option<PathBuf>,
    pub mode: DrawMode,
    pub theme: String,
    /// Overrides the mode's default sensitivity when set
    pub sensitivity: Option<f32>,
    pub volume: f32,
    pub fft_size: usize,
    pub fps: u32,
    pub pixel_ratio: f32,
    /// Canvas pixels per terminal cell (columns, rows)
    pub cell_px: (u16, u16),
    pub autoplay: bool,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            audio_path: None,
            mode: DrawMode::default(),
            theme: DEFAULT_THEME.to_string(),
            sensitivity: None,
            volume: DEFAULT_VOLUME,
            fft_size: DEFAULT_FFT_SIZE,
            fps: 60,
            pixel_ratio: 1.0,
            cell_px: DEFAULT_CELL_PX,
            autoplay: false,
        }
    }
}

/// Logging configuration. The terminal UI owns stdout, so logs only go to a
/// file.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Level name: trace, debug, info, warn or error
    pub level: String,
    /// Log file; `None` disables logging
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some(std::env::temp_dir().join("pulseviz.log")),
        }
    }
}

impl LogConfig {
    /// Parse the configured level, defaulting to INFO.
    pub fn parse_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VisualizerConfig::default();
        assert_eq!(config.mode, DrawMode::Bars);
        assert_eq!(config.theme, "neon");
        assert_eq!(config.fft_size, 2048);
        assert_eq!(config.fps, 60);
        assert_eq!(config.volume, 0.7);
    }

    #[test]
    fn test_parse_level() {
        let mut log = LogConfig::default();
        assert_eq!(log.parse_level(), Level::INFO);
        log.level = "DEBUG".into();
        assert_eq!(log.parse_level(), Level::DEBUG);
        log.level = "chatty".into();
        assert_eq!(log.parse_level(), Level::INFO);
    }
}
