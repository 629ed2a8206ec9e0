//! TUI rendering module.
//!
//! This module draws the viewer with ratatui:
//! - The ring of annotation arcs on a braille canvas, turned by the current
//!   rotation, with the reference guide at 12 o'clock
//! - A track panel listing annotations per track
//! - The sequence excerpt around the displayed position
//! - Status bar with position, rotation and command line

use std::f64::consts::TAU;
use std::str::FromStr;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::layout::Arc;
use crate::model::{Annotation, AppMode, AppState};
use crate::viewer::{CircularViewer, EXCERPT_FLANK};

/// Width of the track panel (including border).
const TRACK_PANEL_WIDTH: u16 = 28;
/// Height of the excerpt panel (including border).
const EXCERPT_HEIGHT: u16 = 3;
/// Height of the status bar.
const STATUS_BAR_HEIGHT: u16 = 1;
/// Angular sampling step for arcs, in radians.
const ARC_SAMPLE_STEP: f64 = TAU / 720.0;
/// Radial sampling step inside an arc band.
const BAND_SAMPLE_STEP: f64 = 2.0;

/// Picks the display color of an annotation.
///
/// This trait allows for different color schemes to be implemented.
pub trait ColorScheme {
    fn get_color(&self, annotation: &Annotation) -> Color;
}

/// Uses the annotation's own color when it names one, otherwise a color
/// derived from its type.
pub struct TypeColorScheme;

const TYPE_PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::LightGreen,
    Color::LightRed,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
];

impl ColorScheme for TypeColorScheme {
    fn get_color(&self, annotation: &Annotation) -> Color {
        if let Some(color) = annotation.color.as_deref().and_then(|c| Color::from_str(c).ok()) {
            return color;
        }
        let hash = annotation
            .kind
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        TYPE_PALETTE[hash % TYPE_PALETTE.len()]
    }
}

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Main layout: content area + excerpt + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(EXCERPT_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);

    // Split content area: ring (left) + track panel (right)
    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(TRACK_PANEL_WIDTH),
        ])
        .split(main_layout[0]);

    render_ring(frame, state, content_layout[0]);
    render_track_panel(frame, state, content_layout[1]);
    render_excerpt(frame, &state.viewer, main_layout[1]);
    render_status_bar(frame, state, main_layout[2]);
}

/// Samples the band covered by `arc`, turned by `rotation` degrees.
fn arc_points(viewer: &CircularViewer, arc: &Arc, rotation: f64) -> Vec<(f64, f64)> {
    let layout = viewer.layout();
    let steps = (arc.sweep() / ARC_SAMPLE_STEP).ceil().max(1.0) as usize;
    let mut points = Vec::new();
    let mut radius = arc.inner_radius;
    while radius <= arc.outer_radius {
        for i in 0..=steps {
            let angle = arc.start_angle + arc.sweep() * i as f64 / steps as f64;
            points.push(layout.point(radius, angle, rotation));
        }
        radius += BAND_SAMPLE_STEP;
    }
    points
}

/// Renders the ring of annotations.
fn render_ring(frame: &mut Frame, state: &AppState, area: Rect) {
    let viewer = &state.viewer;
    let layout = *viewer.layout();
    let (cx, cy) = layout.center();
    let rotation = viewer.angle();
    let guide = layout.guide_length(viewer.tracks().len());
    let scheme = TypeColorScheme;

    let title = format!("{} [{} residues]", viewer.target(), viewer.sequence().len());
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds([0.0, layout.width])
        .y_bounds([0.0, layout.height])
        .paint(move |ctx| {
            for (annotation, arc) in viewer.arcs() {
                let color = if state.highlighted == Some(annotation.id) {
                    Color::White
                } else {
                    scheme.get_color(annotation)
                };
                let coords = arc_points(viewer, &arc, rotation);
                ctx.draw(&Points {
                    coords: &coords,
                    color,
                });
            }
            // Reference guide, fixed at 12 o'clock
            ctx.draw(&CanvasLine::new(cx, cy, cx, cy + guide, Color::Blue));
        });
    frame.render_widget(canvas, area);
}

/// Renders the annotations grouped by track.
fn render_track_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let viewer = &state.viewer;
    let scheme = TypeColorScheme;
    let mut lines: Vec<Line> = Vec::new();

    for track in viewer.tracks() {
        lines.push(Line::from(Span::styled(
            format!("Track {}", track.id),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for &idx in &track.features {
            let annotation = &viewer.annotations()[idx];
            let style = if state.highlighted == Some(annotation.id) {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(scheme.get_color(annotation))
            };
            lines.push(Line::from(Span::styled(
                format!(
                    " #{} {} {}-{}",
                    annotation.id, annotation.kind, annotation.start, annotation.stop
                ),
                style,
            )));
        }
    }

    let block = Block::default().borders(Borders::ALL).title("Tracks");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the residues around the displayed position.
fn render_excerpt(frame: &mut Frame, viewer: &CircularViewer, area: Rect) {
    let excerpt: Vec<char> = viewer.current_excerpt().chars().collect();
    let split = EXCERPT_FLANK.min(excerpt.len());
    let before: String = excerpt[..split].iter().collect();
    let current: String = excerpt[split..].iter().take(1).collect();
    let rest: String = excerpt[split..].iter().skip(1).collect();

    let line = Line::from(vec![
        Span::raw(before),
        Span::styled(
            current,
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(rest),
    ])
    .centered();

    let title = format!("Position {}", viewer.displayed_position());
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let (mode_str, command_str) = match &state.mode {
        AppMode::Normal => ("NORMAL", String::new()),
        AppMode::Command(cmd) => ("COMMAND", format!(":{}", cmd)),
    };

    let rotation = state.viewer.rotation();
    let spin = if rotation.is_spinning() { "spinning" } else { "still" };
    let position_info = format!(
        "Pos {}/{} | {:.1}° {} | Tracks {} ",
        state.viewer.displayed_position(),
        state.viewer.sequence().len(),
        rotation.effective_angle(),
        spin,
        state.viewer.tracks().len()
    );

    // Show status message or last notification if present
    let message = state.status_text().unwrap_or_default();

    let left_content = if command_str.is_empty() {
        format!(" {} | {} ", mode_str, message)
    } else {
        format!(" {} | {} ", mode_str, command_str)
    };

    let left_len = left_content.chars().count();
    let status_line = Line::from(vec![
        Span::styled(left_content, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(
            " ".repeat((area.width as usize).saturating_sub(left_len + position_info.chars().count())),
            Style::default().bg(Color::Cyan),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::demo::demo_options;

    #[test]
    fn test_explicit_and_type_colors() {
        let scheme = TypeColorScheme;
        let green = Annotation::new(0, 1, 2, "x").with_color("green");
        assert_eq!(scheme.get_color(&green), Color::Green);

        // Unknown color names fall back to the type color
        let a = Annotation::new(1, 1, 2, "sit").with_color("not-a-color");
        let b = Annotation::new(2, 5, 9, "sit");
        assert_eq!(scheme.get_color(&a), scheme.get_color(&b));
        assert!(TYPE_PALETTE.contains(&scheme.get_color(&b)));
    }

    #[test]
    fn test_arc_points_cover_band() {
        let viewer = CircularViewer::new(demo_options()).unwrap();
        let (_, arc) = viewer.arcs().next().unwrap();
        let points = arc_points(&viewer, &arc, 0.0);
        let (cx, cy) = viewer.layout().center();
        for (x, y) in points {
            let r = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            assert!(r >= arc.inner_radius - 1e-6 && r <= arc.outer_radius + 1e-6);
        }
    }

    #[test]
    fn test_render_smoke() {
        let mut state = AppState::new(CircularViewer::new(demo_options()).unwrap());
        state.viewer.go_to(66);
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, &state)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Position 66"));
        assert!(text.contains("Track 4"));
        assert!(text.contains("NORMAL"));
    }
}
