//! Overlap detection between circular intervals.
//!
//! An interval with `start <= stop` covers the closed range `[start, stop]`.
//! One with `start > stop` wraps through the origin and covers
//! `[start, L] ∪ [1, stop]`. Both ends are inclusive, so intervals that only
//! touch at a boundary residue still overlap.
//!
//! The sequence length never needs to be known here: every position is at most
//! `L`, so the wrapping tail `[start, L]` can be treated as open-ended.

use crate::model::Annotation;

/// A closed span over a circular sequence, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: usize,
    pub stop: usize,
}

impl Interval {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Returns true if the interval crosses the origin.
    pub fn wraps(&self) -> bool {
        self.start > self.stop
    }

    /// Returns true if `pos` is covered by the interval.
    pub fn contains(&self, pos: usize) -> bool {
        if self.wraps() {
            pos >= self.start || pos <= self.stop
        } else {
            pos >= self.start && pos <= self.stop
        }
    }

    /// Linear pieces covered by the interval: one, or two when it wraps.
    fn segments(&self) -> [Option<(usize, usize)>; 2] {
        if self.wraps() {
            [Some((self.start, usize::MAX)), Some((1, self.stop))]
        } else {
            [Some((self.start, self.stop)), None]
        }
    }
}

impl From<&Annotation> for Interval {
    fn from(annotation: &Annotation) -> Self {
        Self::new(annotation.start, annotation.stop)
    }
}

/// Returns true if the position sets covered by `a` and `b` intersect.
///
/// Symmetric in its arguments; the track allocator relies on that.
pub fn overlaps(a: Interval, b: Interval) -> bool {
    a.segments().iter().flatten().any(|&(a_start, a_stop)| {
        b.segments()
            .iter()
            .flatten()
            .any(|&(b_start, b_stop)| a_start <= b_stop && b_start <= a_stop)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: usize, stop: usize) -> Interval {
        Interval::new(start, stop)
    }

    #[test]
    fn test_linear_intervals() {
        assert!(overlaps(iv(10, 20), iv(15, 30)));
        assert!(overlaps(iv(10, 20), iv(12, 14)));
        assert!(!overlaps(iv(10, 20), iv(21, 30)));
    }

    #[test]
    fn test_touching_boundaries_overlap() {
        assert!(overlaps(iv(10, 20), iv(20, 30)));
        assert!(overlaps(iv(355, 12), iv(12, 40)));
        assert!(overlaps(iv(355, 12), iv(300, 355)));
    }

    #[test]
    fn test_wraparound() {
        assert!(overlaps(iv(355, 12), iv(1, 5)));
        assert!(!overlaps(iv(355, 12), iv(100, 200)));
        assert!(overlaps(iv(355, 12), iv(390, 400)));
        // Two wrapping intervals always share the origin
        assert!(overlaps(iv(355, 12), iv(390, 2)));
    }

    #[test]
    fn test_full_circle_overlaps_everything() {
        let full = iv(100, 99);
        for other in [iv(1, 1), iv(99, 99), iv(100, 100), iv(400, 400), iv(200, 300), iv(350, 10)] {
            assert!(overlaps(full, other), "{other:?}");
        }
    }

    #[test]
    fn test_single_points() {
        assert!(overlaps(iv(50, 50), iv(40, 60)));
        assert!(!overlaps(iv(50, 50), iv(51, 60)));
        assert!(overlaps(iv(5, 5), iv(355, 12)));
        assert!(!overlaps(iv(13, 13), iv(355, 12)));
        assert!(overlaps(iv(7, 7), iv(7, 7)));
    }

    #[test]
    fn test_symmetry() {
        let samples = [
            iv(1, 1),
            iv(1, 400),
            iv(19, 305),
            iv(143, 283),
            iv(355, 12),
            iv(253, 136),
            iv(12, 12),
            iv(13, 354),
            iv(400, 1),
            iv(200, 199),
        ];
        for &a in &samples {
            for &b in &samples {
                assert_eq!(overlaps(a, b), overlaps(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_contains() {
        let wrap = iv(355, 12);
        assert!(wrap.wraps());
        assert!(wrap.contains(400));
        assert!(wrap.contains(1));
        assert!(wrap.contains(12));
        assert!(!wrap.contains(13));
        assert!(!iv(10, 20).wraps());
        assert!(iv(10, 20).contains(20));
    }
}
