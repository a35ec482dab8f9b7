//! Render module - signal shaping, color themes and the per-frame draw pipeline.

pub mod commands;
pub mod modes;
pub mod pipeline;
pub mod scheduler;
pub mod shaper;
pub mod surface;
pub mod theme;
pub mod time;

// Re-export commonly used types
pub use commands::{DrawCommand, Paint, PathSegment, Point};
pub use modes::DrawMode;
pub use pipeline::{PipelineState, RenderPipeline, TickInput, TickOutcome};
pub use scheduler::FrameScheduler;
pub use surface::{CanvasGeometry, FrameBuffer, Surface};
pub use theme::{color_for, dynamic_color, Color, ColorTheme};
pub use time::format_time;
