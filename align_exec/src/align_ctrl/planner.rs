//! Position planning for the scan phases

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A position of the two axis actuator.
///
/// Units: actuator units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both axes of `self` are within `tol` of `other`.
    ///
    /// A tolerance of zero is an exact comparison.
    pub fn reached(&self, other: &Position, tol: f64) -> bool {
        maths::within(self.x, other.x, tol) && maths::within(self.y, other.y, tol)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The point one step away from `current` in the direction of `angle_rad`.
///
/// Used by both the spiral and the line scan.
pub fn next_point(current: Position, angle_rad: f64, step: f64) -> Position {
    Position {
        x: current.x + angle_rad.cos() * step,
        y: current.y + angle_rad.sin() * step,
    }
}

/// Rotate a scan direction by +90 degrees, keeping it in [0, 2pi).
pub fn rotate_quarter(angle_rad: f64) -> f64 {
    maths::wrap_2pi(angle_rad + FRAC_PI_2)
}

#[cfg(test)]
mod test {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_next_point() {
        let p = next_point(Position::new(0.0, 0.0), 0.0, 50.0);
        assert_eq!(p, Position::new(50.0, 0.0));

        let p = next_point(Position::new(10.0, 10.0), FRAC_PI_2, 50.0);
        assert!((p.x - 10.0).abs() < EPS);
        assert!((p.y - 60.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_quarter() {
        let mut angle = 0.0;
        for i in 1..4 {
            angle = rotate_quarter(angle);
            assert!((angle - i as f64 * FRAC_PI_2).abs() < EPS);
        }

        // A full turn wraps back to zero
        angle = rotate_quarter(angle);
        assert!(angle.abs() < EPS || (angle - std::f64::consts::TAU).abs() < EPS);
    }

    #[test]
    fn test_reached() {
        let a = Position::new(1.0, 2.0);
        assert!(a.reached(&Position::new(1.0, 2.0), 0.0));
        assert!(!a.reached(&Position::new(1.0, 2.0 + 1e-6), 0.0));
        assert!(a.reached(&Position::new(1.4, 1.6), 0.5));
    }
}
