//! First-fit packing of annotations into concentric tracks.
//!
//! Annotations are processed in the order given. Each one goes into the first
//! existing track (in creation order) that holds nothing overlapping it, and a
//! new track is opened only when none fits. The packing is valid but not
//! necessarily minimal, and the input order decides the result.

use tracing::{instrument, trace};

use crate::model::Annotation;
use crate::overlap::{overlaps, Interval};

/// A radial lane of mutually non-overlapping annotations.
///
/// Features are stored as indices into the annotation slice the track was
/// built from, in placement order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: usize,
    pub features: Vec<usize>,
}

impl Track {
    fn new(id: usize) -> Self {
        Self {
            id,
            features: Vec::new(),
        }
    }

    /// Indices of the track's features that overlap `interval`.
    pub fn overlapping<'a>(
        &'a self,
        annotations: &'a [Annotation],
        interval: Interval,
    ) -> impl Iterator<Item = usize> + 'a {
        self.features
            .iter()
            .copied()
            .filter(move |&idx| overlaps(Interval::from(&annotations[idx]), interval))
    }

    /// Returns true if `interval` can join this track.
    pub fn accepts(&self, annotations: &[Annotation], interval: Interval) -> bool {
        self.overlapping(annotations, interval).next().is_none()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Places `annotations[index]` into `tracks` by the first-fit rule.
///
/// Only the indices already present in `tracks` are checked, so this is the
/// single-annotation step of [`allocate`]. Sets the annotation's `track` field
/// and returns the chosen track id.
pub fn place(tracks: &mut Vec<Track>, annotations: &mut [Annotation], index: usize) -> usize {
    let interval = Interval::from(&annotations[index]);

    let track_id = match tracks.iter().position(|t| t.accepts(annotations, interval)) {
        Some(pos) => pos,
        None => {
            tracks.push(Track::new(tracks.len()));
            tracks.len() - 1
        }
    };

    tracks[track_id].features.push(index);
    annotations[index].track = Some(track_id);
    trace!(id = annotations[index].id, track = track_id, "placed annotation");
    track_id
}

/// Packs every annotation from scratch, in slice order.
///
/// No state survives between calls, so the same ordered input always gives
/// the same assignment.
#[instrument(level = "debug", skip_all, fields(count = annotations.len()))]
pub fn allocate(annotations: &mut [Annotation]) -> Vec<Track> {
    let mut tracks = Vec::new();
    for index in 0..annotations.len() {
        place(&mut tracks, annotations, index);
    }
    tracks
}

/// Rebuilds `tracks` without the feature that sat at index `removed`, leaving
/// every other feature on its lane.
///
/// `annotations` is the slice after that feature was taken out, so indices
/// past `removed` shift down by one. Tracks left empty are dropped and the
/// rest renumbered from 0, with the `track` fields updated to match.
pub fn without_feature(
    tracks: &[Track],
    annotations: &mut [Annotation],
    removed: usize,
) -> Vec<Track> {
    let mut kept: Vec<Track> = Vec::with_capacity(tracks.len());
    for track in tracks {
        let features: Vec<usize> = track
            .features
            .iter()
            .filter(|&&idx| idx != removed)
            .map(|&idx| if idx > removed { idx - 1 } else { idx })
            .collect();
        if features.is_empty() {
            continue;
        }
        let id = kept.len();
        for &idx in &features {
            annotations[idx].track = Some(id);
        }
        kept.push(Track { id, features });
    }
    kept
}
