//! Data model for the circular viewer.
//!
//! This module contains:
//! - The circular sequence and its annotations
//! - Application state for the terminal front end
//!
//! Track packing, rotation and mapping live in their own modules; the
//! application state only forwards user intent to the [`CircularViewer`].

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::notify::Notification;
use crate::rotation::Direction;
use crate::viewer::CircularViewer;

/// Identifier of an annotation, unique among live annotations.
pub type AnnotationId = u32;

/// Represents the circular sequence with its identifier and residues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The sequence identifier (from FASTA header, without '>')
    pub id: String,
    /// The residues (nucleotides or amino acids)
    pub data: String,
}

impl Sequence {
    /// Creates a new sequence.
    pub fn new(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
        }
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Gets the residue at a 1-indexed position.
    pub fn residue_at(&self, pos: usize) -> Option<char> {
        if pos == 0 {
            return None;
        }
        self.data.as_bytes().get(pos - 1).map(|&b| b as char)
    }

    /// Residues around `pos`: `flank` before it, then `pos` and the
    /// `flank - 1` after it, wrapping around the origin.
    ///
    /// Returns `None` if `pos` is outside the sequence.
    pub fn excerpt(&self, pos: usize, flank: usize) -> Option<String> {
        let len = self.len();
        if pos == 0 || pos > len {
            return None;
        }
        let bytes = self.data.as_bytes();
        let center = pos - 1;
        let excerpt = (0..2 * flank)
            .map(|i| {
                // center - flank + i, modulo len, without going negative
                let idx = (center + i + len * (flank / len + 1) - flank) % len;
                bytes[idx] as char
            })
            .collect();
        Some(excerpt)
    }
}

/// A labeled span over the circular sequence.
///
/// `start > stop` means the span wraps through the origin. `track` is set by
/// the track allocator and absent until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub start: usize,
    pub stop: usize,
    /// Annotation type; drives the default color
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<usize>,
}

impl Annotation {
    /// Creates an unassigned annotation without explicit color.
    pub fn new(id: AnnotationId, start: usize, stop: usize, kind: impl Into<String>) -> Self {
        Self {
            id,
            start,
            stop,
            kind: kind.into(),
            color: None,
            track: None,
        }
    }

    /// Sets an explicit color, overriding the type-based one.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Returns true if the span crosses the origin.
    pub fn wraps(&self) -> bool {
        self.start > self.stop
    }
}

/// Application mode for handling different input states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Command input mode (after pressing ':')
    Command(String),
}

/// The complete application state.
#[derive(Debug)]
pub struct AppState {
    /// The viewer core
    pub viewer: CircularViewer,
    /// Current application mode
    pub mode: AppMode,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Status message to display
    pub status_message: Option<String>,
    /// Annotation under the (virtual) pointer
    pub highlighted: Option<AnnotationId>,
    /// Last notification raised by the viewer
    notices: Rc<RefCell<Option<String>>>,
}

impl AppState {
    /// Creates a new application state around a viewer.
    pub fn new(mut viewer: CircularViewer) -> Self {
        let notices = Rc::new(RefCell::new(None));
        for kind in Notification::ALL {
            let notices = Rc::clone(&notices);
            viewer.on(kind, move |kind, ann| {
                *notices.borrow_mut() = Some(format!(
                    "{}: #{} {} {}-{}",
                    kind, ann.id, ann.kind, ann.start, ann.stop
                ));
            });
        }
        Self {
            viewer,
            mode: AppMode::Normal,
            should_quit: false,
            status_message: None,
            highlighted: None,
            notices,
        }
    }

    /// Status line text: explicit messages win over notifications.
    pub fn status_text(&self) -> Option<String> {
        self.status_message
            .clone()
            .or_else(|| self.notices.borrow().clone())
    }

    /// Starts spinning the ring.
    pub fn start_rotation(&mut self, direction: Direction) {
        self.viewer.start_rotation(direction);
    }

    /// Stops spinning the ring.
    pub fn stop_rotation(&mut self) {
        self.viewer.stop_rotation();
    }

    /// Advances the rotation by one scheduler tick.
    pub fn tick(&mut self) {
        self.viewer.tick();
    }

    /// Moves the highlight to the next annotation, raising mouseout/mouseover.
    pub fn highlight_next(&mut self) {
        let ids: Vec<AnnotationId> = self.viewer.annotations().iter().map(|a| a.id).collect();
        if ids.is_empty() {
            self.highlighted = None;
            return;
        }
        let next = match self.highlighted.and_then(|id| ids.iter().position(|&x| x == id)) {
            Some(i) => ids[(i + 1) % ids.len()],
            None => ids[0],
        };
        if let Some(prev) = self.highlighted {
            self.viewer.annotation_mouseout(prev);
        }
        self.viewer.annotation_mouseover(next);
        self.highlighted = Some(next);
        self.status_message = None;
    }

    /// Clicks the highlighted annotation.
    pub fn click_highlighted(&mut self) {
        if let Some(id) = self.highlighted {
            self.viewer.annotation_click(id);
            self.status_message = None;
        }
    }

    /// Enters command mode.
    pub fn enter_command_mode(&mut self) {
        self.mode = AppMode::Command(String::new());
    }

    /// Handles a character input in command mode.
    pub fn command_input(&mut self, c: char) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.push(c);
        }
    }

    /// Handles backspace in command mode.
    pub fn command_backspace(&mut self) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.pop();
            if cmd.is_empty() {
                self.mode = AppMode::Normal;
            }
        }
    }

    /// Executes the current command.
    pub fn execute_command(&mut self) {
        if let AppMode::Command(cmd) = std::mem::take(&mut self.mode) {
            self.status_message = self.run_command(cmd.trim());
        }
        self.mode = AppMode::Normal;
    }

    /// Runs one command line, returning the status message to show.
    fn run_command(&mut self, cmd: &str) -> Option<String> {
        let mut words = cmd.split_whitespace();
        match words.next() {
            Some("q") | Some("quit") => {
                self.should_quit = true;
                None
            }
            Some("rm") | Some("remove") => match words.next().map(str::parse::<AnnotationId>) {
                Some(Ok(id)) => {
                    if self.viewer.remove_annotation(id).is_none() {
                        Some(format!("No annotation with id {}", id))
                    } else {
                        if self.highlighted == Some(id) {
                            self.highlighted = None;
                        }
                        None
                    }
                }
                _ => Some("Usage: :rm <id>".to_string()),
            },
            Some("add") => {
                let args: Vec<&str> = words.collect();
                match parse_add_args(&args) {
                    Some(annotation) => match self.viewer.add_annotation(annotation) {
                        Ok(_) => None,
                        Err(e) => Some(e.to_string()),
                    },
                    None => Some("Usage: :add <id> <start> <stop> <type> [color]".to_string()),
                }
            }
            Some(other) => match other.parse::<usize>() {
                Ok(pos) => {
                    if self.viewer.go_to(pos) {
                        None
                    } else {
                        Some(format!("Invalid position: {}", pos))
                    }
                }
                Err(_) => Some(format!("Unknown command: {}", cmd)),
            },
            None => None,
        }
    }

    /// Cancels command mode and returns to normal mode.
    pub fn cancel_command(&mut self) {
        self.mode = AppMode::Normal;
    }
}

/// Parses `<id> <start> <stop> <type> [color]`.
fn parse_add_args(args: &[&str]) -> Option<Annotation> {
    let (id, start, stop, kind) = match args {
        [id, start, stop, kind] | [id, start, stop, kind, _] => (
            id.parse::<AnnotationId>().ok()?,
            start.parse::<usize>().ok()?,
            stop.parse::<usize>().ok()?,
            *kind,
        ),
        _ => return None,
    };
    let annotation = Annotation::new(id, start, stop, kind);
    Some(match args.get(4) {
        Some(color) => annotation.with_color(*color),
        None => annotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerOptions;

    fn state() -> AppState {
        let options = ViewerOptions {
            sequence: "ACGT".repeat(100),
            features: vec![
                Annotation::new(0, 19, 305, "voluptate").with_color("green"),
                Annotation::new(3, 355, 12, "sit"),
            ],
            ..ViewerOptions::default()
        };
        AppState::new(CircularViewer::new(options).unwrap())
    }

    fn run(state: &mut AppState, cmd: &str) {
        state.enter_command_mode();
        for c in cmd.chars() {
            state.command_input(c);
        }
        state.execute_command();
    }

    #[test]
    fn test_sequence_residue_at() {
        let seq = Sequence::new("seq1", "ACGT");
        assert_eq!(seq.residue_at(1), Some('A'));
        assert_eq!(seq.residue_at(4), Some('T'));
        assert_eq!(seq.residue_at(0), None);
        assert_eq!(seq.residue_at(5), None);
    }

    #[test]
    fn test_sequence_excerpt_wraps() {
        let seq = Sequence::new("s", "ABCDEFGHIJ");
        assert_eq!(seq.excerpt(5, 2).as_deref(), Some("CDEF"));
        assert_eq!(seq.excerpt(1, 3).as_deref(), Some("HIJABC"));
        assert_eq!(seq.excerpt(10, 2).as_deref(), Some("HIJA"));
        assert_eq!(seq.excerpt(0, 2), None);
        assert_eq!(seq.excerpt(11, 2), None);
        // Flanks longer than the sequence keep cycling
        assert_eq!(Sequence::new("s", "AB").excerpt(1, 3).as_deref(), Some("BABABA"));
    }

    #[test]
    fn test_annotation_json_fields() {
        let ann: Annotation =
            serde_json::from_str(r#"{ "id": 3, "start": 355, "stop": 12, "type": "sit" }"#).unwrap();
        assert_eq!(ann, Annotation::new(3, 355, 12, "sit"));
        assert!(ann.wraps());

        let json = serde_json::to_string(&Annotation::new(1, 2, 3, "x").with_color("red")).unwrap();
        assert_eq!(json, r#"{"id":1,"start":2,"stop":3,"type":"x","color":"red"}"#);
    }

    #[test]
    fn test_goto_command() {
        let mut state = state();
        run(&mut state, "66");
        assert_eq!(state.viewer.displayed_position(), 66);
        assert!(state.status_message.is_none());

        run(&mut state, "0");
        assert_eq!(state.status_message.as_deref(), Some("Invalid position: 0"));
        assert_eq!(state.viewer.displayed_position(), 66);
        assert_eq!(state.mode, AppMode::Normal);
    }

    #[test]
    fn test_add_and_remove_commands() {
        let mut state = state();
        run(&mut state, "add 14 351 190 dolore");
        assert!(state.status_message.is_none());
        assert_eq!(state.viewer.annotations().len(), 3);
        assert_eq!(
            state.status_text().as_deref(),
            Some("annotationAdded: #14 dolore 351-190")
        );

        run(&mut state, "add 15 0 10 bad");
        assert!(state.status_message.as_deref().unwrap().contains("outside the sequence"));
        assert_eq!(state.viewer.annotations().len(), 3);

        run(&mut state, "rm 14");
        assert_eq!(state.viewer.annotations().len(), 2);
        run(&mut state, "rm 14");
        assert_eq!(state.status_message.as_deref(), Some("No annotation with id 14"));

        run(&mut state, "add 1 2");
        assert!(state.status_message.as_deref().unwrap().starts_with("Usage"));
    }

    #[test]
    fn test_quit_and_unknown_commands() {
        let mut state = state();
        run(&mut state, "frobnicate");
        assert_eq!(state.status_message.as_deref(), Some("Unknown command: frobnicate"));
        assert!(!state.should_quit);
        run(&mut state, "q");
        assert!(state.should_quit);
    }

    #[test]
    fn test_highlight_cycles_and_notifies() {
        let mut state = state();
        state.highlight_next();
        assert_eq!(state.highlighted, Some(0));
        assert_eq!(
            state.status_text().as_deref(),
            Some("annotationMouseover: #0 voluptate 19-305")
        );
        state.highlight_next();
        assert_eq!(state.highlighted, Some(3));
        state.highlight_next();
        assert_eq!(state.highlighted, Some(0));

        state.click_highlighted();
        assert_eq!(
            state.status_text().as_deref(),
            Some("annotationClick: #0 voluptate 19-305")
        );
    }

    #[test]
    fn test_rotation_ticks() {
        let mut state = state();
        state.start_rotation(Direction::CounterClockwise);
        state.tick();
        assert_eq!(state.viewer.displayed_position(), 3);
        state.stop_rotation();
        state.tick();
        assert_eq!(state.viewer.displayed_position(), 3);
    }
}
