//! Per-frame render orchestration.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::commands::DrawCommand;
use super::modes::{bars, circular, placeholder, wave, DrawMode};
use super::scheduler::FrameScheduler;
use super::shaper::{shape_bars, shape_circular};
use super::surface::{CanvasGeometry, Surface};
use super::theme::{self, Color, ColorTheme, DEFAULT_THEME};

const BACKGROUND: Color = Color::rgb(8, 8, 16);
const MAX_SENSITIVITY: f32 = 5.0;
pub const DEFAULT_VOLUME: f32 = 0.7;

/// User-facing render settings, read once at the start of each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    mode: DrawMode,
    theme: &'static ColorTheme,
    sensitivity: f32,
    volume: f32,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            mode: DrawMode::default(),
            theme: theme::theme(DEFAULT_THEME),
            sensitivity: DrawMode::default().default_sensitivity(),
            volume: DEFAULT_VOLUME,
        }
    }
}

impl PipelineState {
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn theme(&self) -> &'static ColorTheme {
        self.theme
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Switch layout; sensitivity resets to the new mode's default.
    pub fn set_mode(&mut self, mode: DrawMode) {
        if self.mode != mode {
            self.mode = mode;
            self.sensitivity = mode.default_sensitivity();
        }
    }

    /// Select a theme by id; unknown ids select the default theme.
    pub fn set_theme(&mut self, id: &str) {
        self.theme = theme::theme(id);
    }

    pub fn next_theme(&mut self) {
        self.theme = theme::next_theme(self.theme.id);
    }

    pub fn previous_theme(&mut self) {
        self.theme = theme::previous_theme(self.theme.id);
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        if sensitivity.is_finite() {
            self.sensitivity = sensitivity.clamp(0.0, MAX_SENSITIVITY);
        }
    }

    pub fn adjust_sensitivity(&mut self, delta: f32) {
        self.set_sensitivity(self.sensitivity + delta);
    }

    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}

/// Buffers and clock for one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    pub frequency: &'a [u8],
    pub time: &'a [u8],
    /// Wall-clock seconds since the pipeline started
    pub elapsed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Canvas has no area; only the clear was issued.
    Skipped,
    /// No usable audio; the idle animation was drawn.
    Placeholder,
    Drawn(DrawMode),
}

/// Drives the draw loop: owns the canvas geometry and the frame scheduler.
#[derive(Debug)]
pub struct RenderPipeline {
    geometry: CanvasGeometry,
    scheduler: FrameScheduler,
    started: Option<Instant>,
}

impl RenderPipeline {
    pub fn new(fps: u32) -> Self {
        Self {
            geometry: CanvasGeometry::default(),
            scheduler: FrameScheduler::with_rate(fps),
            started: None,
        }
    }

    pub fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    /// Resynchronise the backing store with the container size.
    pub fn resize(&mut self, client_width: u32, client_height: u32, pixel_ratio: f32) {
        let geometry = CanvasGeometry::from_client(client_width, client_height, pixel_ratio);
        if geometry != self.geometry {
            debug!(
                "canvas resized to {}x{} (backing {}x{})",
                client_width, client_height, geometry.backing_width, geometry.backing_height
            );
            self.geometry = geometry;
        }
    }

    pub fn start(&mut self, now: Instant) {
        info!("render loop started at {:?} per frame", self.scheduler.interval());
        self.started = Some(now);
        self.scheduler.start(now);
    }

    /// Cancel the next scheduled frame.
    pub fn stop(&mut self) {
        if self.scheduler.is_running() {
            info!("render loop stopped");
        }
        self.scheduler.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// True when a frame is due; re-arms the scheduler.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.scheduler.poll(now)
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_next(now)
    }

    /// Seconds since [`RenderPipeline::start`].
    pub fn elapsed(&self, now: Instant) -> f32 {
        self.started
            .map(|s| now.saturating_duration_since(s).as_secs_f32())
            .unwrap_or(0.0)
    }

    /// Draw one frame onto `surface`.
    pub fn tick(
        &self,
        surface: &mut impl Surface,
        input: TickInput<'_>,
        state: &PipelineState,
    ) -> TickOutcome {
        let geometry = self.geometry;
        surface.begin_frame(&geometry);
        surface.draw(DrawCommand::Clear { color: BACKGROUND });

        if geometry.is_empty() {
            return TickOutcome::Skipped;
        }

        let elapsed = if input.elapsed.is_finite() { input.elapsed } else { 0.0 };
        let volume = state.volume;

        let no_signal = input.frequency.iter().all(|&b| b == 0);
        let commands = match state.mode {
            _ if no_signal => None,
            DrawMode::Bars => {
                let n = bars::bar_count(&geometry);
                if n == 0 {
                    // narrower than one bar slot
                    return TickOutcome::Skipped;
                }
                let values = shape_bars(input.frequency, n, state.sensitivity);
                Some(bars::render(&values, state.theme, &geometry, volume))
            }
            DrawMode::Circular => {
                let values =
                    shape_circular(input.frequency, circular::POINT_COUNT, state.sensitivity);
                Some(circular::render(&values, state.theme, &geometry, volume, elapsed))
            }
            DrawMode::Wave if input.time.is_empty() => None,
            DrawMode::Wave => Some(wave::render(
                input.time,
                state.theme,
                &geometry,
                state.sensitivity,
                volume,
            )),
        };

        match commands {
            Some(commands) => {
                for command in commands {
                    surface.draw(command);
                }
                TickOutcome::Drawn(state.mode)
            }
            None => {
                for command in placeholder::render(&geometry, elapsed) {
                    surface.draw(command);
                }
                TickOutcome::Placeholder
            }
        }
    }
}
