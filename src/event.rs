//! Keyboard event handling.
//!
//! Key bindings:
//! - `←` or `h`: spin the ring clockwise
//! - `→` or `l`: spin the ring counter-clockwise
//! - key release (when the terminal reports it) or `space`: stop spinning
//! - `Tab`: highlight the next annotation (mouseover/mouseout)
//! - `Enter`: click the highlighted annotation
//! - `:`: enter command mode
//!   - `:q` or `:quit`: quit the application
//!   - `:<number>`: rotate to a sequence position
//!   - `:add <id> <start> <stop> <type> [color]`: add an annotation
//!   - `:rm <id>`: remove an annotation

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::model::{AppMode, AppState};
use crate::rotation::Direction;

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    /// Quit the application
    Quit,
    /// Start spinning in a direction
    StartRotation(Direction),
    /// Stop spinning
    StopRotation,
    /// Highlight the next annotation
    HighlightNext,
    /// Click the highlighted annotation
    ClickHighlighted,
    /// Enter command mode
    EnterCommandMode,
    /// Add character to command buffer
    CommandChar(char),
    /// Execute current command
    ExecuteCommand,
    /// Cancel command mode
    CancelCommand,
    /// Backspace in command mode
    CommandBackspace,
    /// Resize event (terminal resized)
    Resize(u16, u16),
}

/// Polls for keyboard events with a timeout.
///
/// Returns `None` if no event occurred within the timeout.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event to an Action based on current app mode.
pub fn handle_event(event: Event, mode: &AppMode) -> Action {
    match event {
        Event::Key(key_event) => handle_key_event(key_event, mode),
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    }
}

/// Handles a key event based on the current application mode.
fn handle_key_event(key: KeyEvent, mode: &AppMode) -> Action {
    match mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Command(_) if key.kind == KeyEventKind::Release => Action::None,
        AppMode::Command(_) => handle_command_mode(key),
    }
}

/// Handles key events in normal mode.
fn handle_normal_mode(key: KeyEvent) -> Action {
    let is_spin_key = matches!(
        key.code,
        KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l')
    );
    if key.kind == KeyEventKind::Release {
        return if is_spin_key {
            Action::StopRotation
        } else {
            Action::None
        };
    }

    // Handle Ctrl+C for emergency quit
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => Action::StartRotation(Direction::Clockwise),
        KeyCode::Right | KeyCode::Char('l') => Action::StartRotation(Direction::CounterClockwise),
        KeyCode::Char(' ') => Action::StopRotation,

        KeyCode::Tab => Action::HighlightNext,
        KeyCode::Enter => Action::ClickHighlighted,

        // Command mode
        KeyCode::Char(':') => Action::EnterCommandMode,

        _ => Action::None,
    }
}

/// Handles key events in command mode.
fn handle_command_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ExecuteCommand,
        KeyCode::Esc => Action::CancelCommand,
        KeyCode::Backspace => Action::CommandBackspace,
        KeyCode::Char(c) => Action::CommandChar(c),
        _ => Action::None,
    }
}

/// Applies an action to the application state.
///
/// Returns `true` if the application should continue, `false` if it should quit.
pub fn apply_action(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::None => {}
        Action::Quit => {
            state.should_quit = true;
        }
        Action::StartRotation(direction) => {
            state.start_rotation(direction);
        }
        Action::StopRotation => {
            state.stop_rotation();
        }
        Action::HighlightNext => {
            state.highlight_next();
        }
        Action::ClickHighlighted => {
            state.click_highlighted();
        }
        Action::EnterCommandMode => {
            state.stop_rotation();
            state.enter_command_mode();
        }
        Action::CommandChar(c) => {
            state.command_input(c);
        }
        Action::ExecuteCommand => {
            state.execute_command();
        }
        Action::CancelCommand => {
            state.cancel_command();
        }
        Action::CommandBackspace => {
            state.command_backspace();
        }
        Action::Resize(_, _) => {
            // The canvas scales to any area, nothing to recompute
        }
    }

    !state.should_quit
}
