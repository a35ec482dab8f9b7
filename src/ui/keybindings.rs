//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::render::DrawMode;

/// Seconds skipped by the arrow keys
pub const SEEK_STEP: f64 = 5.0;
pub const VOLUME_STEP: f32 = 0.05;
pub const SENSITIVITY_STEP: f32 = 0.1;

/// Map shifted digit symbols to a section number (1..2).
pub fn section_for_key(k: &KeyEvent) -> Option<usize> {
    match k.code {
        KeyCode::Char('!') => Some(1),
        KeyCode::Char('@') => Some(2),
        _ => None,
    }
}

/// Actions derived from key events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    TogglePause,
    /// Seek by this many seconds
    Seek(f64),
    /// Change volume by this amount
    Volume(f32),
    ToggleMute,
    SelectMode(DrawMode),
    CycleMode,
    NextTheme,
    PreviousTheme,
    Sensitivity(f32),
    ToggleSection(usize),
    Quit,
    None,
}

/// Convert a key event to an action.
pub fn key_to_action(key: &KeyEvent) -> Action {
    // Check for section toggle first
    if let Some(section) = section_for_key(key) {
        return Action::ToggleSection(section);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char(' ') => Action::TogglePause,
        KeyCode::Left => Action::Seek(-SEEK_STEP),
        KeyCode::Right => Action::Seek(SEEK_STEP),
        KeyCode::Up => Action::Volume(VOLUME_STEP),
        KeyCode::Down => Action::Volume(-VOLUME_STEP),
        KeyCode::Char('m') => Action::ToggleMute,
        KeyCode::Char('1') => Action::SelectMode(DrawMode::Bars),
        KeyCode::Char('2') => Action::SelectMode(DrawMode::Circular),
        KeyCode::Char('3') => Action::SelectMode(DrawMode::Wave),
        KeyCode::Tab => Action::CycleMode,
        KeyCode::Char('t') => Action::NextTheme,
        KeyCode::Char('T') => Action::PreviousTheme,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Sensitivity(SENSITIVITY_STEP),
        KeyCode::Char('-') => Action::Sensitivity(-SENSITIVITY_STEP),
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}
