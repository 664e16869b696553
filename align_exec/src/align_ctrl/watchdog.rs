//! Stall watchdog
//!
//! Counts the ticks spent waiting for the actuator to reach its wanted position. If the actuator
//! fails to arrive within the limit the controller gives up on the target and holds the current
//! position instead.

use log::debug;

/// Tick counter guarding against an actuator that never reaches its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StallWatchdog {
    limit_ticks: u32,
    count: u32,

    /// Set on dispatch, cleared on the first tick afterwards. Used so that the motion being
    /// waited on is only logged once per move.
    arrival_latch: bool,
}

impl StallWatchdog {
    pub fn new(limit_ticks: u32) -> Self {
        Self {
            limit_ticks,
            count: 0,
            arrival_latch: false,
        }
    }

    /// Count one tick. Returns true if the limit has been exceeded, in which case the counter is
    /// reset and the caller must retarget.
    pub fn tick(&mut self) -> bool {
        self.count += 1;

        if self.count > self.limit_ticks {
            debug!("Stall limit of {} ticks exceeded", self.limit_ticks);
            self.count = 0;
            true
        } else {
            false
        }
    }

    /// Record that the actuator arrived and the phase was dispatched.
    pub fn arrived(&mut self) {
        self.count = 0;
        self.arrival_latch = true;
    }

    /// Returns true exactly once after each arrival.
    pub fn take_latch(&mut self) -> bool {
        std::mem::replace(&mut self.arrival_latch, false)
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fires_after_limit() {
        let mut wd = StallWatchdog::new(200);

        for _ in 0..200 {
            assert!(!wd.tick());
        }
        assert!(wd.tick());
        assert_eq!(wd.count(), 0);

        // Fires again only after another full period
        for _ in 0..200 {
            assert!(!wd.tick());
        }
        assert!(wd.tick());
    }

    #[test]
    fn test_arrival_resets() {
        let mut wd = StallWatchdog::new(3);
        wd.tick();
        wd.tick();
        wd.tick();
        wd.arrived();
        assert_eq!(wd.count(), 0);
        assert!(!wd.tick());

        assert!(wd.take_latch());
        assert!(!wd.take_latch());
    }
}
