//! Best position tracking

use serde::Serialize;

use super::Position;

/// Best position and received power seen within the current scan episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestPosition {
    pub position: Position,

    /// Units: decibels
    pub power_db: f64,
}

impl BestPosition {
    /// Start a new episode from the given sample.
    pub fn new(position: Position, power_db: f64) -> Self {
        Self {
            position,
            power_db,
        }
    }

    /// Discard the episode and restart it from the given sample.
    pub fn reset_to(&mut self, position: Position, power_db: f64) {
        *self = Self::new(position, power_db);
    }

    /// Record the sample if it is strictly better than the current best.
    ///
    /// Returns true if the best was updated.
    pub fn offer(&mut self, position: Position, power_db: f64) -> bool {
        if power_db > self.power_db {
            self.reset_to(position, power_db);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_offer_is_monotonic() {
        let mut best = BestPosition::new(Position::new(0.0, 0.0), -10.0);
        let samples = [-12.0, -5.0, -5.0, -7.0, 3.0, 2.9];
        let mut last = best.power_db;

        for (i, s) in samples.iter().enumerate() {
            best.offer(Position::new(i as f64, 0.0), *s);
            assert!(best.power_db >= last);
            last = best.power_db;
        }

        assert_eq!(best.power_db, 3.0);
        assert_eq!(best.position, Position::new(4.0, 0.0));
    }

    #[test]
    fn test_equal_power_keeps_first() {
        let mut best = BestPosition::new(Position::new(1.0, 1.0), 2.0);
        assert!(!best.offer(Position::new(5.0, 5.0), 2.0));
        assert_eq!(best.position, Position::new(1.0, 1.0));
    }

    #[test]
    fn test_reset_allows_decrease() {
        let mut best = BestPosition::new(Position::new(1.0, 1.0), 20.0);
        best.reset_to(Position::new(2.0, 2.0), -3.0);
        assert_eq!(best.power_db, -3.0);
    }
}
