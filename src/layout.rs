//! Ring geometry for renderers.
//!
//! Tracks are stacked outward from half the ring radius, one fixed-width band
//! per track. Angles are in radians, measured clockwise from 12 o'clock.

use std::f64::consts::TAU;

use crate::mapping::CoordinateMapper;
use crate::model::Annotation;

/// Radial distance between the inner edges of consecutive tracks.
pub const TRACK_SPACING: f64 = 12.0;
/// Radial thickness of one annotation arc.
pub const ARC_THICKNESS: f64 = 10.0;

/// Angular and radial extent of one annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    /// Always greater than `start_angle`; wrapping arcs end past a full turn
    pub end_angle: f64,
}

impl Arc {
    /// Angular size in radians.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Geometry of the viewer's drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

impl RingLayout {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as f64, height as f64);
        Self {
            width,
            height,
            radius: width.min(height) / 2.0,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Inner radius of the band used by `track`.
    pub fn inner_radius(&self, track: usize) -> f64 {
        self.radius / 2.0 + TRACK_SPACING * track as f64
    }

    /// Length of the reference guide drawn from the center past every track.
    pub fn guide_length(&self, track_count: usize) -> f64 {
        self.inner_radius(track_count)
    }

    /// Arc for an annotation, or `None` if it has no track yet.
    pub fn arc(&self, mapper: &CoordinateMapper, annotation: &Annotation) -> Option<Arc> {
        let track = annotation.track?;
        let inner_radius = self.inner_radius(track);
        let start_angle = mapper.position_to_radians(annotation.start);
        let mut end_angle = mapper.position_to_radians(annotation.stop + 1);
        if annotation.start > annotation.stop {
            end_angle += TAU;
        }
        Some(Arc {
            inner_radius,
            outer_radius: inner_radius + ARC_THICKNESS,
            start_angle,
            end_angle,
        })
    }

    /// Drawing-area point at `radius` and `angle` radians after turning the
    /// content by `rotation` degrees. The y axis points up.
    pub fn point(&self, radius: f64, angle: f64, rotation: f64) -> (f64, f64) {
        let (cx, cy) = self.center();
        let theta = angle + rotation.to_radians();
        (cx + radius * theta.sin(), cy + radius * theta.cos())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_radius_from_smaller_side() {
        let layout = RingLayout::new(715, 505);
        assert_eq!(layout.radius, 252.5);
        assert_eq!(layout.center(), (357.5, 252.5));
        assert_eq!(layout.inner_radius(0), 126.25);
        assert_eq!(layout.inner_radius(2), 150.25);
        assert_eq!(layout.guide_length(5), 186.25);
    }

    #[test]
    fn test_linear_arc() {
        let layout = RingLayout::new(500, 500);
        let mapper = CoordinateMapper::new(400).unwrap();
        let mut ann = Annotation::new(0, 101, 200, "a");
        assert!(layout.arc(&mapper, &ann).is_none());

        ann.track = Some(1);
        let arc = layout.arc(&mapper, &ann).unwrap();
        assert_eq!(arc.inner_radius, 137.0);
        assert_eq!(arc.outer_radius, 147.0);
        assert!((arc.start_angle - PI / 2.0).abs() < EPS);
        assert!((arc.end_angle - PI).abs() < EPS);
    }

    #[test]
    fn test_wrapping_arc_extends_past_full_turn() {
        let layout = RingLayout::new(500, 500);
        let mapper = CoordinateMapper::new(400).unwrap();
        let mut ann = Annotation::new(3, 355, 12, "sit");
        ann.track = Some(0);
        let arc = layout.arc(&mapper, &ann).unwrap();
        assert!(arc.end_angle > TAU);
        // 46 + 12 residues
        assert!((arc.sweep() - 58.0 / 400.0 * TAU).abs() < EPS);
    }

    #[test]
    fn test_single_residue_and_last_residue() {
        let layout = RingLayout::new(500, 500);
        let mapper = CoordinateMapper::new(400).unwrap();
        let mut ann = Annotation::new(1, 400, 400, "end");
        ann.track = Some(0);
        let arc = layout.arc(&mapper, &ann).unwrap();
        assert!((arc.end_angle - TAU).abs() < EPS);
        assert!((arc.sweep() - TAU / 400.0).abs() < EPS);
    }

    #[test]
    fn test_point_rotation() {
        let layout = RingLayout::new(200, 200);
        let (x, y) = layout.point(50.0, 0.0, 0.0);
        assert!((x - 100.0).abs() < EPS && (y - 150.0).abs() < EPS);

        // Turning the content 90 degrees clockwise moves 12 o'clock to 3 o'clock
        let (x, y) = layout.point(50.0, 0.0, 90.0);
        assert!((x - 150.0).abs() < EPS && (y - 100.0).abs() < EPS);
    }
}
