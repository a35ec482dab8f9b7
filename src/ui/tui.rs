//! Terminal setup and the frame-scheduled event loop.

use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::info;

use crate::{app::App, config::VisualizerConfig};

/// Longest wait for input while the scheduler is idle
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Run the visualizer until the user quits.
pub fn run(config: VisualizerConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(config);
    let result = event_loop(&mut terminal, &mut app);
    app.shutdown();

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    let size = terminal.size()?;
    app.on_resize(Rect::new(0, 0, size.width, size.height));
    app.pipeline.start(Instant::now());
    info!("render loop started");

    loop {
        if app.pipeline.poll(Instant::now()) {
            app.on_frame(Instant::now());
            terminal.draw(|f| app.draw(f))?;
        }

        let timeout = app
            .pipeline
            .time_until_next(Instant::now())
            .unwrap_or(IDLE_POLL);
        if event::poll(timeout)? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.on_key(key) {
                        info!("quit requested");
                        return Ok(());
                    }
                }
                CEvent::Resize(width, height) => app.on_resize(Rect::new(0, 0, width, height)),
                _ => {}
            }
        }
    }
}
