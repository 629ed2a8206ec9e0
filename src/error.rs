//! Error types shared by the viewer core.

use thiserror::Error;

use crate::model::AnnotationId;

/// Errors raised when the viewer rejects an operation.
///
/// None of these are fatal: the viewer keeps its previous state and stays
/// usable after returning one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    #[error("Sequence is empty, a circular viewer needs at least one residue")]
    EmptySequence,

    #[error("Annotation {id}: {field} {position} is outside the sequence (1-{length})")]
    PositionOutOfRange {
        id: AnnotationId,
        field: &'static str,
        position: usize,
        length: usize,
    },

    #[error("Residue {residue:?} at position {position} is not an ASCII sequence letter")]
    InvalidResidue { position: usize, residue: char },

    #[error("Drawing area must be at least 1x1 (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Annotation id {0} is already in use")]
    DuplicateId(AnnotationId),

    #[error("Rotation speed must be a positive number (got {0})")]
    InvalidSpeed(f64),

    #[error("Rotation step must cover at least one residue")]
    InvalidStep,
}

/// Result type for viewer operations.
pub type ViewerResult<T> = Result<T, ViewerError>;
