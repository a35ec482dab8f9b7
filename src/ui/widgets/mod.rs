//! Custom widgets for the pulseviz UI.

pub mod player_panel;
pub mod visualizer;

// Re-export widget rendering functions
pub use player_panel::render_player_panel;
pub use visualizer::{canvas_area, render_visualizer};
