//! Player information panel widget.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::audio::PlaybackState;
use crate::render::time::{format_time, progress_ratio};

/// Text shown for the transport: `MM:SS / MM:SS`.
pub fn time_label(playback: &PlaybackState) -> String {
    format!(
        "{} / {}",
        format_time(playback.current_time),
        format_time(playback.duration)
    )
}

/// Render the player information panel.
pub fn render_player_panel(
    f: &mut Frame<'_>,
    area: Rect,
    track_title: Option<&str>,
    artist: Option<&str>,
    playback: &PlaybackState,
) {
    f.render_widget(Block::default().borders(Borders::ALL).title("2: Player"), area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let title = match (track_title, artist) {
        (Some(t), Some(a)) => format!("{} - {}", a, t),
        (Some(t), None) => t.to_string(),
        _ => "No track loaded".to_string(),
    };
    f.render_widget(Paragraph::new(title).alignment(Alignment::Center), inner[0]);

    let play_pause_icon = if playback.is_playing {
        Span::styled(" ⏸ ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ⏵ ", Style::default().fg(Color::Yellow))
    };
    let volume = if playback.muted {
        Span::styled("muted", Style::default().fg(Color::Red))
    } else {
        Span::raw(format!("vol {:>3}%", (playback.volume * 100.0).round() as u32))
    };
    let controls = Line::from(vec![
        Span::styled(" ⏪ ", Style::default().fg(Color::Cyan)),
        play_pause_icon,
        Span::styled(" ⏩ ", Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        volume,
    ]);
    f.render_widget(Paragraph::new(controls).alignment(Alignment::Center), inner[1]);

    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC))
            .ratio(progress_ratio(playback.current_time, playback.duration))
            .label(time_label(playback)),
        inner[2],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_label() {
        let playback = PlaybackState {
            current_time: 65.0,
            duration: f64::NAN,
            ..PlaybackState::default()
        };
        assert_eq!(time_label(&playback), "01:05 / 00:00");
    }
}
