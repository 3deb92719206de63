//! Terminal runtime
//!
//! Interactive loop over crossterm plus a headless renderer used by the
//! `--snapshot` mode and the visual regression tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bitskip_viz::app::{App, Tab};
//! use bitskip_viz::tui::{self, TuiConfig};
//!
//! // Interactive
//! tui::run(&TuiConfig::default())?;
//!
//! // Headless, for tests
//! let frame = tui::render_to_string(&App::new(Tab::Intrinsic), 120, 48)?;
//! let cells = tui::render_to_buffer(&App::new(Tab::Intrinsic), 120, 48)?;
//! ```

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend, TestBackend},
    buffer::Buffer,
    Terminal,
};
use tracing::{debug, info};

use crate::app::{ui, App, Tab};
use crate::error::{DashboardError, Result};

/// TUI configuration
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Event poll interval in milliseconds
    pub tick_rate_ms: u64,
    /// Tab shown on start
    pub initial_tab: Tab,
    /// Snapshot width in columns
    pub width: u16,
    /// Snapshot height in rows
    pub height: u16,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            initial_tab: Tab::Overview,
            width: 120,
            height: 48,
        }
    }
}

impl TuiConfig {
    /// Poll interval as a duration
    #[must_use]
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Run the interactive dashboard until the user quits.
///
/// The terminal is restored on every exit path, including when drawing or
/// event polling fails.
pub fn run(config: &TuiConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(err.into());
        },
    };

    info!(tab = ?config.initial_tab, tick_ms = config.tick_rate_ms, "starting dashboard");
    let mut app = App::new(config.initial_tab);
    let result = run_app(&mut terminal, &mut app, config.tick_rate());
    let restored = restore(&mut terminal);

    // a loop error wins over a restore error
    result?;
    restored
}

fn restore(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Draw, poll, apply; repeat until the app asks to quit
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, tick: Duration) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Resize(width, height) => debug!(width, height, "terminal resized"),
                _ => {},
            }
        }

        if app.should_quit() {
            debug!("quit requested");
            return Ok(());
        }
    }
}

/// Render one frame of `app` headlessly and return the cell buffer.
///
/// Zero-sized frames are rejected.
pub fn render_to_buffer(app: &App, width: u16, height: u16) -> Result<Buffer> {
    if width == 0 || height == 0 {
        return Err(DashboardError::InvalidDimensions { width, height });
    }

    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|f| ui(f, app))?;
    Ok(terminal.backend().buffer().clone())
}

/// Render one frame of `app` headlessly and return it as text.
///
/// Trailing spaces are trimmed from each row. Zero-sized frames are
/// rejected.
pub fn render_to_string(app: &App, width: u16, height: u16) -> Result<String> {
    let buffer = render_to_buffer(app, width, height)?;
    let mut output = String::with_capacity(buffer.content().len() + height as usize);
    for row in buffer.content().chunks(width as usize) {
        let line: String = row.iter().map(|cell| cell.symbol()).collect();
        output.push_str(line.trim_end());
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert_eq!(config.tick_rate_ms, 250);
        assert_eq!(config.initial_tab, Tab::Overview);
        assert_eq!((config.width, config.height), (120, 48));
        assert_eq!(config.tick_rate(), Duration::from_millis(250));
    }

    #[test]
    fn test_render_to_string_line_count() {
        let output = render_to_string(&App::default(), 120, 48).expect("render");
        assert_eq!(output.lines().count(), 48);
        assert!(output.lines().all(|l| l.chars().count() <= 120));
    }

    #[test]
    fn test_render_zero_dimensions_rejected() {
        for (w, h) in [(0, 48), (120, 0), (0, 0)] {
            let err = render_to_string(&App::default(), w, h).unwrap_err();
            assert!(matches!(err, DashboardError::InvalidDimensions { .. }));
            assert_eq!(
                format!("{:?}", err.exit_code()),
                format!("{:?}", std::process::ExitCode::from(2))
            );
        }
    }

    #[test]
    fn test_render_to_buffer_matches_string() {
        let app = App::new(Tab::EarlyExit);
        let buffer = render_to_buffer(&app, 100, 30).expect("render");
        assert_eq!(buffer.area.width, 100);
        assert_eq!(buffer.area.height, 30);
        let text = render_to_string(&app, 100, 30).expect("render");
        let first_row: String = buffer.content()[..100].iter().map(|c| c.symbol()).collect();
        assert_eq!(text.lines().next(), Some(first_row.trim_end()));
        assert!(matches!(
            render_to_buffer(&app, 0, 30),
            Err(DashboardError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        for tab in Tab::ALL {
            let output = render_to_string(&App::new(tab), 40, 12).expect("render");
            assert_eq!(output.lines().count(), 12);
        }
    }
}
