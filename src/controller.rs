//! Application controller.
//!
//! This module orchestrates the main application loop:
//! - Terminal initialization and cleanup
//! - Event polling and handling
//! - Rotation ticks and rendering
//!
//! Rotation is a cooperative loop: every tick interval the controller calls
//! the viewer's `tick`, which does nothing once spinning has been stopped.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use crate::event::{apply_action, handle_event, poll_event};
use crate::model::AppState;
use crate::ui::render;

/// Default interval between rotation ticks.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(16);

/// The main application controller.
pub struct App {
    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state
    state: AppState,
    /// Interval between rotation ticks
    tick_rate: Duration,
    /// Whether key release events were requested from the terminal
    enhanced_keys: bool,
}

impl App {
    /// Creates a new application with the given state.
    pub fn new(state: AppState, tick_rate: Duration) -> Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Key releases let a held arrow key spin and a released one stop
        let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keys {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        debug!(enhanced_keys, "terminal ready");

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state,
            tick_rate,
            enhanced_keys,
        })
    }

    /// Runs the main application loop.
    pub fn run(&mut self) -> Result<()> {
        let mut last_tick = Instant::now();

        loop {
            // Render
            self.terminal.draw(|frame| {
                render(frame, &self.state);
            })?;

            // Handle events until the next tick is due
            let timeout = self.tick_rate.saturating_sub(last_tick.elapsed());
            if let Some(event) = poll_event(timeout) {
                let action = handle_event(event, &self.state.mode);
                apply_action(&mut self.state, action);

                if self.state.should_quit {
                    break;
                }
            }

            if last_tick.elapsed() >= self.tick_rate {
                self.state.tick();
                last_tick = Instant::now();
            }
        }

        info!(position = self.state.viewer.displayed_position(), "viewer closed");
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal
        if self.enhanced_keys {
            let _ = execute!(self.terminal.backend_mut(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Convenience function to run the application with a prepared state.
pub fn run_app(state: AppState, tick_rate: Duration) -> Result<()> {
    let mut app = App::new(state, tick_rate)?;
    app.run()
}
