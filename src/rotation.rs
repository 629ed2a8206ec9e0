//! Continuous rotation of the ring.
//!
//! Rotation is advanced one step per scheduler tick while the controller is
//! spinning. [`RotationController::stop`] only clears the flag; the next tick
//! sees it and does nothing, so there is no pending work to cancel.
//!
//! A positive angle turns the content clockwise. The position displayed at
//! the fixed reference point (12 o'clock) is therefore the one whose own angle
//! is `-angle`.

use tracing::debug;

use crate::error::{ViewerError, ViewerResult};
use crate::mapping::{CoordinateMapper, FULL_TURN};

/// Residues covered by one rotation step at speed 1.
pub const DEFAULT_STEP_RESIDUES: usize = 2;

/// Spin direction of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// `+1.0` for clockwise, `-1.0` otherwise.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }
}

/// Tick-driven rotation state.
#[derive(Debug, Clone)]
pub struct RotationController {
    mapper: CoordinateMapper,
    /// Cumulative angle in degrees, not wrapped
    angle: f64,
    direction: Direction,
    speed: f64,
    step_size: f64,
    spinning: bool,
}

impl RotationController {
    /// Creates a stopped controller at angle 0.
    ///
    /// `step_residues` is converted to the angle advanced per tick at speed 1.
    pub fn new(mapper: CoordinateMapper, speed: f64, step_residues: usize) -> ViewerResult<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ViewerError::InvalidSpeed(speed));
        }
        if step_residues == 0 {
            return Err(ViewerError::InvalidStep);
        }
        Ok(Self {
            mapper,
            angle: 0.0,
            direction: Direction::Clockwise,
            speed,
            step_size: mapper.span_degrees(step_residues),
            spinning: false,
        })
    }

    /// Starts spinning in `direction` from the current angle.
    pub fn start(&mut self, direction: Direction) {
        if !self.spinning || self.direction != direction {
            debug!(?direction, angle = self.angle, "rotation started");
        }
        self.direction = direction;
        self.spinning = true;
    }

    /// Stops spinning; takes effect at the next tick.
    pub fn stop(&mut self) {
        if self.spinning {
            debug!(angle = self.angle, "rotation stopped");
        }
        self.spinning = false;
    }

    /// Advances one step if spinning.
    ///
    /// Returns the newly displayed position, or `None` when stopped.
    pub fn tick(&mut self) -> Option<usize> {
        if !self.spinning {
            return None;
        }
        self.angle += self.direction.sign() * self.step_size * self.speed;
        Some(self.displayed_position())
    }

    /// Turns the ring so that `pos` sits at the reference point.
    ///
    /// Positions outside the sequence are ignored. Returns whether the angle
    /// changed.
    pub fn go_to(&mut self, pos: usize) -> bool {
        if !self.mapper.contains(pos) {
            debug!(pos, "go to ignored, position outside the sequence");
            return false;
        }
        self.angle = -self.mapper.position_to_angle(pos);
        true
    }

    /// Sequence position currently at the reference point.
    pub fn displayed_position(&self) -> usize {
        self.mapper.angle_to_position(-self.angle)
    }

    /// Cumulative angle in degrees.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Angle wrapped into `[0, 360)`.
    pub fn effective_angle(&self) -> f64 {
        self.angle.rem_euclid(FULL_TURN)
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Degrees advanced per tick at speed 1.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }
}
