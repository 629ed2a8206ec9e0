//! The circular feature viewer.
//!
//! [`CircularViewer`] ties the pieces together: the sequence and its
//! coordinate mapper, the annotation store with its tracks, the rotation
//! controller and the notification channels. Renderers read annotations,
//! arcs, the current angle and the sequence excerpt from here, and feed user
//! requests back through `go_to`, `add_annotation` and `remove_annotation`.

use tracing::{debug, info};

use crate::config::ViewerOptions;
use crate::error::{ViewerError, ViewerResult};
use crate::layout::{Arc, RingLayout};
use crate::mapping::CoordinateMapper;
use crate::model::{Annotation, AnnotationId, Sequence};
use crate::notify::{Notification, Notifier};
use crate::rotation::{Direction, RotationController};
use crate::store::AnnotationStore;
use crate::tracks::Track;

/// Residues shown on each side of the displayed position.
pub const EXCERPT_FLANK: usize = 10;

/// Residue alphabet: ASCII letters, `*` for stop and `-` for gaps.
fn is_residue(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '*' || c == '-'
}

/// A circular sequence with packed annotations and a rotatable view.
#[derive(Debug)]
pub struct CircularViewer {
    target: String,
    sequence: Sequence,
    mapper: CoordinateMapper,
    layout: RingLayout,
    store: AnnotationStore,
    rotation: RotationController,
    notifier: Notifier,
}

impl CircularViewer {
    /// Builds a viewer and packs the initial features in their given order.
    ///
    /// Fails on an empty sequence, a residue outside the ASCII letters (plus
    /// `*` and `-`), a zero-sized drawing area, invalid rotation settings or an
    /// invalid initial feature.
    pub fn new(options: ViewerOptions) -> ViewerResult<Self> {
        let ViewerOptions {
            target,
            sequence,
            width,
            height,
            features,
            speed,
            step_residues,
        } = options;

        if sequence.is_empty() {
            return Err(ViewerError::EmptySequence);
        }
        if let Some((i, residue)) = sequence.chars().enumerate().find(|&(_, c)| !is_residue(c)) {
            return Err(ViewerError::InvalidResidue {
                position: i + 1,
                residue,
            });
        }
        if width == 0 || height == 0 {
            return Err(ViewerError::InvalidDimensions { width, height });
        }
        let sequence = Sequence::new(target.clone(), sequence.to_uppercase());
        let mapper = CoordinateMapper::new(sequence.len())?;
        let rotation = RotationController::new(mapper, speed, step_residues)?;
        let store = AnnotationStore::with_annotations(sequence.len(), features)?;

        info!(
            target = %target,
            length = sequence.len(),
            features = store.len(),
            tracks = store.track_count(),
            "viewer initialized"
        );

        Ok(Self {
            target,
            sequence,
            mapper,
            layout: RingLayout::new(width, height),
            store,
            rotation,
            notifier: Notifier::new(),
        })
    }

    /// Registers a listener on one notification channel.
    pub fn on<F>(&mut self, kind: Notification, listener: F)
    where
        F: FnMut(Notification, &Annotation) + 'static,
    {
        self.notifier.on(kind, listener);
    }

    /// Rotates the ring so `pos` sits at the reference point.
    ///
    /// Positions outside the sequence are ignored; returns whether the view
    /// changed.
    pub fn go_to(&mut self, pos: usize) -> bool {
        self.rotation.go_to(pos)
    }

    /// Adds an annotation on the first track that fits it.
    ///
    /// Raises `annotationAdded` with the assigned annotation, which is also
    /// returned.
    pub fn add_annotation(&mut self, annotation: Annotation) -> ViewerResult<Annotation> {
        let added = self.store.add(annotation)?.clone();
        self.notifier.emit(Notification::AnnotationAdded, &added);
        Ok(added)
    }

    /// Removes the annotation with `id` and repacks the remaining ones.
    ///
    /// Unknown ids change nothing and raise nothing.
    pub fn remove_annotation(&mut self, id: AnnotationId) -> Option<Annotation> {
        let removed = self.store.remove(id)?;
        self.notifier.emit(Notification::AnnotationRemoved, &removed);
        Some(removed)
    }

    /// Repacks every annotation from scratch.
    pub fn reorganize(&mut self) {
        self.store.reorganize();
    }

    pub fn start_rotation(&mut self, direction: Direction) {
        self.rotation.start(direction);
    }

    pub fn stop_rotation(&mut self) {
        self.rotation.stop();
    }

    /// Advances the rotation by one scheduler tick.
    ///
    /// Returns the newly displayed position while spinning.
    pub fn tick(&mut self) -> Option<usize> {
        self.rotation.tick()
    }

    /// Raises `annotationMouseover` for `id`; returns false for unknown ids.
    pub fn annotation_mouseover(&mut self, id: AnnotationId) -> bool {
        self.emit_for(Notification::AnnotationMouseover, id)
    }

    /// Raises `annotationMouseout` for `id`; returns false for unknown ids.
    pub fn annotation_mouseout(&mut self, id: AnnotationId) -> bool {
        self.emit_for(Notification::AnnotationMouseout, id)
    }

    /// Raises `annotationClick` for `id`; returns false for unknown ids.
    pub fn annotation_click(&mut self, id: AnnotationId) -> bool {
        self.emit_for(Notification::AnnotationClick, id)
    }

    fn emit_for(&mut self, kind: Notification, id: AnnotationId) -> bool {
        match self.store.get(id) {
            Some(annotation) => {
                self.notifier.emit(kind, annotation);
                true
            }
            None => {
                debug!(id, %kind, "notification ignored, unknown annotation id");
                false
            }
        }
    }

    /// Residues around `pos`, `flank` on each side; `None` outside the
    /// sequence.
    pub fn sequence_chunk(&self, pos: usize, flank: usize) -> Option<String> {
        self.sequence.excerpt(pos, flank)
    }

    /// Residues around the position at the reference point.
    pub fn current_excerpt(&self) -> String {
        self.sequence
            .excerpt(self.displayed_position(), EXCERPT_FLANK)
            .unwrap_or_default()
    }

    /// Sequence position at the reference point.
    pub fn displayed_position(&self) -> usize {
        self.rotation.displayed_position()
    }

    /// Cumulative rotation in degrees, clockwise.
    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }

    /// Arc geometry of every annotation, in insertion order.
    pub fn arcs(&self) -> impl Iterator<Item = (&Annotation, Arc)> + '_ {
        self.store
            .annotations()
            .iter()
            .filter_map(move |a| self.layout.arc(&self.mapper, a).map(|arc| (a, arc)))
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.store.annotations()
    }

    pub fn tracks(&self) -> &[Track] {
        self.store.tracks()
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }

    pub fn rotation(&self) -> &RotationController {
        &self.rotation
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}
