//! Live annotation set and its track structure.

use tracing::{debug, warn};

use crate::error::{ViewerError, ViewerResult};
use crate::model::{Annotation, AnnotationId};
use crate::tracks::{allocate, place, without_feature, Track};

/// Owns the annotations shown by the viewer and keeps their tracks current.
///
/// Annotations keep their insertion order; track features index into that
/// order.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    length: usize,
    annotations: Vec<Annotation>,
    tracks: Vec<Track>,
}

impl AnnotationStore {
    /// Creates an empty store for a sequence of `length` residues.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            annotations: Vec::new(),
            tracks: Vec::new(),
        }
    }

    /// Creates a store from an initial list and packs it.
    ///
    /// Fails on the first annotation that would be rejected by [`add`](Self::add).
    pub fn with_annotations(length: usize, annotations: Vec<Annotation>) -> ViewerResult<Self> {
        let mut store = Self::new(length);
        for annotation in &annotations {
            store.validate(annotation)?;
            if annotations.iter().filter(|a| a.id == annotation.id).count() > 1 {
                return Err(ViewerError::DuplicateId(annotation.id));
            }
        }
        store.annotations = annotations;
        store.reorganize();
        Ok(store)
    }

    /// Adds an annotation using the single-annotation first-fit step.
    ///
    /// Returns the stored annotation with its `track` filled in.
    pub fn add(&mut self, annotation: Annotation) -> ViewerResult<&Annotation> {
        self.validate(&annotation)?;
        if self.get(annotation.id).is_some() {
            warn!(id = annotation.id, "rejected duplicate annotation id");
            return Err(ViewerError::DuplicateId(annotation.id));
        }

        self.annotations.push(annotation);
        let index = self.annotations.len() - 1;
        let track = place(&mut self.tracks, &mut self.annotations, index);
        debug!(id = self.annotations[index].id, track, "added annotation");
        Ok(&self.annotations[index])
    }

    /// Removes the annotation with `id` and repacks the rest.
    ///
    /// If the repack would need more tracks than before, the previous packing
    /// is kept instead, minus the removed annotation and any track it leaves
    /// empty. Returns `None`, leaving everything untouched, if no such id exists.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let Some(index) = self.annotations.iter().position(|a| a.id == id) else {
            debug!(id, "remove ignored, unknown annotation id");
            return None;
        };

        // The removed annotation keeps the track it was shown on
        let removed = self.annotations.remove(index);
        let previous = std::mem::take(&mut self.tracks);
        self.reorganize();
        if self.tracks.len() > previous.len() {
            // First-fit can need more lanes on the smaller set; never grow
            self.tracks = without_feature(&previous, &mut self.annotations, index);
            debug!(id, "repack needed more tracks, previous packing kept");
        }
        debug!(id, tracks = self.tracks.len(), "removed annotation");
        Some(removed)
    }

    /// Repacks every live annotation from scratch, in insertion order.
    pub fn reorganize(&mut self) {
        self.tracks = allocate(&mut self.annotations);
    }

    /// Gets an annotation by id.
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Live annotations in insertion order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Checks both ends of `annotation` against the sequence bounds.
    fn validate(&self, annotation: &Annotation) -> ViewerResult<()> {
        for (field, position) in [("start", annotation.start), ("stop", annotation.stop)] {
            if position < 1 || position > self.length {
                warn!(id = annotation.id, field, position, "rejected annotation outside the sequence");
                return Err(ViewerError::PositionOutOfRange {
                    id: annotation.id,
                    field,
                    position,
                    length: self.length,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlap::overlaps;

    fn demo_store() -> AnnotationStore {
        let spans = [(19, 305), (143, 283), (76, 238), (355, 12), (125, 206), (253, 136)];
        let annotations = spans
            .iter()
            .enumerate()
            .map(|(i, &(start, stop))| Annotation::new(i as u32, start, stop, "demo"))
            .collect();
        AnnotationStore::with_annotations(400, annotations).unwrap()
    }

    fn assignment(store: &AnnotationStore) -> Vec<(AnnotationId, usize)> {
        store
            .annotations()
            .iter()
            .map(|a| (a.id, a.track.unwrap()))
            .collect()
    }

    #[test]
    fn test_initial_packing() {
        let store = demo_store();
        assert_eq!(store.len(), 6);
        assert_eq!(store.track_count(), 5);
        assert_eq!(
            assignment(&store),
            vec![(0, 0), (1, 1), (2, 2), (3, 0), (4, 3), (5, 4)]
        );
    }

    #[test]
    fn test_add_fast_path() {
        let mut store = demo_store();

        let added = store.add(Annotation::new(6, 320, 340, "gap")).unwrap();
        assert_eq!(added.track, Some(0));
        assert_eq!(store.track_count(), 5);

        let added = store.add(Annotation::new(14, 351, 190, "dolore")).unwrap();
        assert_eq!(added.track, Some(5));
        assert_eq!(store.track_count(), 6);
        assert_eq!(store.tracks()[5].features, vec![7]);
    }

    #[test]
    fn test_add_then_reorganize_is_stable() {
        let mut store = demo_store();
        store.add(Annotation::new(6, 320, 340, "gap")).unwrap();
        store.add(Annotation::new(7, 100, 110, "x")).unwrap();
        let before = assignment(&store);
        let tracks_before = store.tracks().to_vec();

        store.reorganize();
        assert_eq!(assignment(&store), before);
        assert_eq!(store.tracks(), tracks_before.as_slice());
    }

    #[test]
    fn test_reorganize_idempotent() {
        let mut store = demo_store();
        store.reorganize();
        let first = (assignment(&store), store.tracks().to_vec());
        store.reorganize();
        assert_eq!((assignment(&store), store.tracks().to_vec()), first);
    }

    #[test]
    fn test_add_rejects_out_of_range() {
        let mut store = demo_store();
        let err = store.add(Annotation::new(9, 0, 10, "bad")).unwrap_err();
        assert!(matches!(err, ViewerError::PositionOutOfRange { field: "start", position: 0, .. }));
        let err = store.add(Annotation::new(9, 10, 401, "bad")).unwrap_err();
        assert!(matches!(err, ViewerError::PositionOutOfRange { field: "stop", position: 401, .. }));
        assert_eq!(store.len(), 6);
        assert_eq!(store.track_count(), 5);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = demo_store();
        assert_eq!(
            store.add(Annotation::new(3, 10, 20, "dup")).unwrap_err(),
            ViewerError::DuplicateId(3)
        );
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_initial_list_validated() {
        let bad = vec![Annotation::new(0, 1, 10, "a"), Annotation::new(0, 20, 30, "b")];
        assert_eq!(
            AnnotationStore::with_annotations(400, bad).unwrap_err(),
            ViewerError::DuplicateId(0)
        );
        let bad = vec![Annotation::new(0, 1, 500, "a")];
        assert!(AnnotationStore::with_annotations(400, bad).is_err());
    }

    #[test]
    fn test_remove_shrinks_and_repacks() {
        let mut store = demo_store();
        let removed = store.remove(0).unwrap();
        assert_eq!(removed.id, 0);
        assert_eq!(removed.start, 19);
        assert_eq!(store.len(), 5);
        assert_eq!(store.track_count(), 4);
        assert_eq!(
            assignment(&store),
            vec![(1, 0), (2, 1), (3, 0), (4, 2), (5, 3)]
        );
    }

    #[test]
    fn test_remove_never_grows_tracks() {
        let mut store = demo_store();
        for id in [3, 5, 1, 4, 2, 0] {
            let tracks = store.track_count();
            let count = store.len();
            assert!(store.remove(id).is_some());
            assert_eq!(store.len(), count - 1);
            assert!(store.track_count() <= tracks);
        }
        assert!(store.is_empty());
        assert_eq!(store.track_count(), 0);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = demo_store();
        let before = (assignment(&store), store.tracks().to_vec());
        assert!(store.remove(42).is_none());
        assert_eq!((assignment(&store), store.tracks().to_vec()), before);

        let mut empty = AnnotationStore::new(10);
        assert!(empty.remove(0).is_none());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_tracks_stay_valid() {
        let mut store = demo_store();
        store.add(Annotation::new(10, 398, 3, "w")).unwrap();
        store.add(Annotation::new(11, 1, 400, "all")).unwrap();
        store.remove(2);
        for track in store.tracks() {
            for (i, &a) in track.features.iter().enumerate() {
                for &b in &track.features[i + 1..] {
                    let (a, b) = (&store.annotations()[a], &store.annotations()[b]);
                    assert!(!overlaps(a.into(), b.into()));
                }
            }
        }
    }

    #[test]
    fn test_remove_keeps_packing_when_repack_grows() {
        let spans = [(9, 9), (1, 3), (5, 10), (2, 4), (4, 6), (3, 8)];
        let annotations = spans
            .iter()
            .enumerate()
            .map(|(i, &(start, stop))| Annotation::new(i as u32, start, stop, "x"))
            .collect();
        let mut store = AnnotationStore::with_annotations(12, annotations).unwrap();
        assert_eq!(store.track_count(), 3);

        // A fresh first-fit of the remaining five needs four tracks
        let mut rest = store.annotations()[1..].to_vec();
        assert_eq!(allocate(&mut rest).len(), 4);

        store.remove(0).unwrap();
        assert_eq!(store.track_count(), 3);
        assert_eq!(
            assignment(&store),
            vec![(1, 0), (2, 1), (3, 1), (4, 0), (5, 2)]
        );
        for track in store.tracks() {
            for (i, &a) in track.features.iter().enumerate() {
                assert_eq!(store.annotations()[a].track, Some(track.id));
                for &b in &track.features[i + 1..] {
                    let (a, b) = (&store.annotations()[a], &store.annotations()[b]);
                    assert!(!overlaps(a.into(), b.into()));
                }
            }
        }
    }
}
