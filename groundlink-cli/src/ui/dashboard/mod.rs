//! Main TUI dashboard for the ground station.
//!
//! Displays the live map, telemetry readout, trend charts and alerts.
//!
//! # Module Structure
//!
//! - `state` - Event types and key mapping (no rendering dependencies)
//! - `render` - Layout orchestration and panel rendering

mod render;
pub mod state;

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use groundlink::dashboard::GroundStation;
use groundlink::map::SceneMap;

pub use state::{DashboardConfig, DashboardEvent, QUIT_CONFIRM_TIMEOUT};

/// The main dashboard UI.
pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    config: DashboardConfig,
    shutdown: Arc<AtomicBool>,
    start_time: Instant,
    /// Quit confirmation state - Some(timestamp) when awaiting confirmation.
    quit_confirmation: Option<Instant>,
}

impl Dashboard {
    /// Enter raw mode and the alternate screen.
    pub fn new(config: DashboardConfig, shutdown: Arc<AtomicBool>) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            config,
            shutdown,
            start_time: Instant::now(),
            quit_confirmation: None,
        })
    }

    /// Restore terminal to normal state.
    pub fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Draw the current state of the ground station.
    pub fn draw(&mut self, station: &GroundStation<SceneMap>) -> io::Result<()> {
        let uptime = self.start_time.elapsed();
        let confirmation_remaining = self.confirmation_remaining();
        let config = &self.config;

        self.terminal.draw(|frame| {
            render::render_ui(frame, station, config, uptime, confirmation_remaining);
        })?;

        Ok(())
    }

    /// Poll for keyboard events (non-blocking).
    ///
    /// Quit handling uses a confirmation flow:
    /// - First 'q' or Esc press: enters confirmation mode (5 second timeout)
    /// - Second 'q' or 'y'/'Y': confirms quit
    /// - 'n'/'N' or Esc: cancels confirmation
    /// - Timeout: auto-cancels after 5 seconds
    pub fn poll_event(&mut self) -> io::Result<Option<DashboardEvent>> {
        if self.shutdown.load(Ordering::SeqCst) {
            tracing::info!("poll_event: shutdown flag is set, returning Quit");
            return Ok(Some(DashboardEvent::Quit));
        }

        if let Some(confirm_time) = self.quit_confirmation {
            if confirm_time.elapsed() > QUIT_CONFIRM_TIMEOUT {
                self.quit_confirmation = None;
            }
        }

        if !event::poll(Duration::from_millis(10))? {
            return Ok(None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }

        if self.quit_confirmation.is_some() {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    return Ok(Some(DashboardEvent::Quit));
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.quit_confirmation = None;
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.quit_confirmation = Some(Instant::now());
                Ok(None)
            }
            code => Ok(state::key_event(code)),
        }
    }

    /// Returns the remaining time for confirmation timeout, if confirming.
    fn confirmation_remaining(&self) -> Option<Duration> {
        self.quit_confirmation
            .map(|t| QUIT_CONFIRM_TIMEOUT.saturating_sub(t.elapsed()))
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
