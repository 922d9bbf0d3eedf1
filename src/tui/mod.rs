//! Interactive terminal UI for browsing nearby airports.
//!
//! # Module Structure
//!
//! - `input` - Key handling and prompt state (no rendering dependencies)
//! - `render` - Layout and widgets

mod input;
mod render;

pub use input::{InputMode, InputState, KeyOutcome, PromptKind};

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::session::Session;
use crate::shell::Screen;

/// Idle time between checks for keys and fetch results
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Owns the terminal for the lifetime of the UI; restores it on drop.
pub struct Browser {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input: InputState,
    restored: bool,
}

impl Browser {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            input: InputState::default(),
            restored: false,
        })
    }

    /// Show a search that was started before the UI opened
    pub fn with_search(mut self, text: Option<String>) -> Self {
        self.input.last_search = text;
        self
    }

    /// Restore terminal to normal state.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn draw(&mut self, session: &Session) -> io::Result<()> {
        let screen = Screen::from_session(session);
        let input = &self.input;
        self.terminal
            .draw(|frame| render::render_ui(frame, &screen, input))?;
        Ok(())
    }

    /// Run until the user quits. Fetch results are applied between key polls.
    pub async fn run(&mut self, session: &mut Session) -> Result<()> {
        info!("Terminal UI started");
        loop {
            session.drain_ready();
            self.draw(session).context("Failed to draw terminal UI")?;

            // Non-blocking poll; sleeping yields the worker to the fetch tasks
            if !event::poll(Duration::ZERO).context("Failed to poll terminal events")? {
                tokio::time::sleep(POLL_INTERVAL).await;
                continue;
            }
            if let Event::Key(key) = event::read().context("Failed to read terminal event")?
                && self.input.handle_key(key, session) == KeyOutcome::Quit
            {
                break;
            }
        }

        session.shutdown();
        self.restore().context("Failed to restore terminal")?;
        info!("Terminal UI closed");
        Ok(())
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "Failed to restore terminal");
        }
    }
}
