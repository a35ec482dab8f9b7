//! Application state management.

use std::{path::PathBuf, sync::Arc, time::Instant};

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use tracing::{error, info, trace};

use crate::{
    audio::{AnalysisDriver, MediaElement},
    config::VisualizerConfig,
    render::{FrameBuffer, PipelineState, RenderPipeline, TickInput, TickOutcome},
    ui::{
        keybindings::{key_to_action, Action},
        layout::{compute_layout, SectionVisibility},
        widgets::{canvas_area, render_player_panel, render_visualizer},
    },
};

/// Main application state.
pub struct App {
    pub config: VisualizerConfig,
    /// Playback transport shared with the analysis driver
    pub media: Arc<MediaElement>,
    pub driver: AnalysisDriver,
    pub pipeline: RenderPipeline,
    /// Mode, theme, sensitivity and volume read by every tick
    pub state: PipelineState,
    /// Last rendered frame
    pub frame: FrameBuffer,
    pub visibility: SectionVisibility,
    track_path: Option<PathBuf>,
    /// Terminal size at the last resize
    area: Rect,
}

impl App {
    /// Create a new application playing through the default output device.
    pub fn new(config: VisualizerConfig) -> Self {
        Self::with_media(config, MediaElement::new())
    }

    /// Create an application around an existing media element.
    ///
    /// A failed analysis setup is logged and leaves the visualizer on its
    /// idle animation; playback still works.
    pub fn with_media(config: VisualizerConfig, media: MediaElement) -> Self {
        let media = Arc::new(media);

        let mut state = PipelineState::default();
        state.set_mode(config.mode);
        state.set_theme(&config.theme);
        if let Some(sensitivity) = config.sensitivity {
            state.set_sensitivity(sensitivity);
        }
        state.set_volume(config.volume);
        media.set_volume(config.volume);

        let mut driver = AnalysisDriver::new();
        if let Err(e) = driver.initialize(media.clone(), config.fft_size) {
            error!("analysis setup failed, showing idle animation: {}", e);
        }

        if let Some(path) = &config.audio_path {
            info!("loading {}", path.display());
            media.load(path);
            if config.autoplay {
                media.play();
            }
        }

        Self {
            pipeline: RenderPipeline::new(config.fps),
            track_path: config.audio_path.clone(),
            config,
            media,
            driver,
            state,
            frame: FrameBuffer::new(),
            visibility: SectionVisibility::default(),
            area: Rect::default(),
        }
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match key_to_action(&key) {
            Action::TogglePause => self.media.toggle(),
            Action::Seek(delta) => self.media.seek_by(delta),
            Action::Volume(delta) => self.media.set_volume(self.media.volume() + delta),
            Action::ToggleMute => self.media.set_muted(!self.media.is_muted()),
            Action::SelectMode(mode) => self.state.set_mode(mode),
            Action::CycleMode => self.state.set_mode(self.state.mode().next()),
            Action::NextTheme => self.state.next_theme(),
            Action::PreviousTheme => self.state.previous_theme(),
            Action::Sensitivity(delta) => self.state.adjust_sensitivity(delta),
            Action::ToggleSection(section) => {
                self.visibility.toggle(section);
                self.on_resize(self.area);
            }
            Action::Quit => return true,
            Action::None => {}
        }
        false
    }

    /// Recompute the canvas geometry for a terminal of `area` cells.
    pub fn on_resize(&mut self, area: Rect) {
        self.area = area;
        let canvas = compute_layout(area, &self.visibility)
            .visualizer_area
            .map(canvas_area)
            .unwrap_or_default();
        let (cell_w, cell_h) = self.config.cell_px;
        self.pipeline.resize(
            canvas.width as u32 * cell_w as u32,
            canvas.height as u32 * cell_h as u32,
            self.config.pixel_ratio,
        );
    }

    /// Sample the analyser and render one frame into the frame buffer.
    pub fn on_frame(&mut self, now: Instant) -> TickOutcome {
        self.driver.pump_events();
        let playback = self.driver.playback();
        self.state
            .set_volume(if playback.muted { 0.0 } else { playback.volume });

        let elapsed = self.pipeline.elapsed(now);
        let analysis = self.driver.sample();
        let outcome = self.pipeline.tick(
            &mut self.frame,
            TickInput {
                frequency: analysis.frequency,
                time: analysis.time,
                elapsed,
            },
            &self.state,
        );
        trace!(?outcome, "frame");
        outcome
    }

    /// Draw the application UI.
    pub fn draw(&self, f: &mut Frame<'_>) {
        let layout = compute_layout(f.area(), &self.visibility);

        if let Some(area) = layout.visualizer_area {
            let title = format!(
                "1: {} · {} · x{:.1}",
                self.state.mode(),
                self.state.theme().name,
                self.state.sensitivity()
            );
            render_visualizer(f, area, &self.frame, &title);
        }

        if let Some(area) = layout.player_area {
            let info = self.media.track_info();
            let title = match (&info, &self.track_path) {
                (Some(info), Some(path)) => Some(info.display_title(path)),
                (None, Some(path)) => path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned()),
                _ => None,
            };
            render_player_panel(
                f,
                area,
                title.as_deref(),
                info.as_ref().and_then(|i| i.artist.as_deref()),
                &self.driver.playback(),
            );
        }
    }

    /// Stop drawing, release the audio graph and silence playback.
    pub fn shutdown(&mut self) {
        self.pipeline.stop();
        self.driver.teardown();
        self.media.stop();
    }
}
