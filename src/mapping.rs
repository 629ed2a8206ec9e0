//! Sequence position <-> angle conversion.
//!
//! Positions are 1-indexed over a circle of `length` residues. Position 1 sits
//! at angle 0 (12 o'clock) and every residue takes `360 / length` degrees, so
//! the last residue ends just before the full turn.

use std::f64::consts::TAU;

use crate::error::{ViewerError, ViewerResult};

/// Degrees in a full turn.
pub const FULL_TURN: f64 = 360.0;

/// Maps linear sequence positions to angles and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    length: usize,
}

impl CoordinateMapper {
    /// Creates a mapper for a circular sequence of `length` residues.
    pub fn new(length: usize) -> ViewerResult<Self> {
        if length == 0 {
            return Err(ViewerError::EmptySequence);
        }
        Ok(Self { length })
    }

    /// Returns the sequence length this mapper covers.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns true if `pos` is a valid 1-indexed position.
    pub fn contains(&self, pos: usize) -> bool {
        pos >= 1 && pos <= self.length
    }

    /// Angle in degrees at which `pos` starts.
    ///
    /// Meant for positions in `[1, length]`; `length + 1` yields a full turn,
    /// which arc geometry relies on for the end of the last residue.
    pub fn position_to_angle(&self, pos: usize) -> f64 {
        (pos as f64 - 1.0) / self.length as f64 * FULL_TURN
    }

    /// Same as [`position_to_angle`](Self::position_to_angle), in radians.
    pub fn position_to_radians(&self, pos: usize) -> f64 {
        (pos as f64 - 1.0) / self.length as f64 * TAU
    }

    /// Position found at `angle` degrees, rounded to the nearest residue.
    ///
    /// Any angle is accepted; it is wrapped into the circle first.
    pub fn angle_to_position(&self, angle: f64) -> usize {
        let len = self.length as f64;
        let offset = (angle.rem_euclid(FULL_TURN) / FULL_TURN * len).round();
        (offset.rem_euclid(len)) as usize + 1
    }

    /// Angular size of `residues` consecutive residues, in degrees.
    pub fn span_degrees(&self, residues: usize) -> f64 {
        residues as f64 / self.length as f64 * FULL_TURN
    }
}
