//! Layout computation for the UI panels.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows taken by the player panel when visible.
const PLAYER_HEIGHT: u16 = 6;

/// Visibility state for UI sections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionVisibility {
    pub visualizer: bool,
    pub player: bool,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self {
            visualizer: true,
            player: true,
        }
    }
}

impl SectionVisibility {
    /// Toggle a section by number (1 = visualizer, 2 = player).
    pub fn toggle(&mut self, section: usize) {
        match section {
            1 => self.visualizer = !self.visualizer,
            2 => self.player = !self.player,
            _ => {}
        }
    }
}

/// Computed layout areas for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedLayout {
    pub visualizer_area: Option<Rect>,
    pub player_area: Option<Rect>,
}

/// Compute the layout based on total area and section visibility.
pub fn compute_layout(area: Rect, visibility: &SectionVisibility) -> ComputedLayout {
    match (visibility.visualizer, visibility.player) {
        (true, true) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(PLAYER_HEIGHT)])
                .split(area);
            ComputedLayout {
                visualizer_area: Some(chunks[0]),
                player_area: Some(chunks[1]),
            }
        }
        (true, false) => ComputedLayout {
            visualizer_area: Some(area),
            player_area: None,
        },
        (false, true) => ComputedLayout {
            visualizer_area: None,
            player_area: Some(area),
        },
        (false, false) => ComputedLayout {
            visualizer_area: None,
            player_area: None,
        },
    }
}
