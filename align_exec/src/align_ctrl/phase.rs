//! Lifecycle and phase enumerations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt::Display;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Outer lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifecycleState {
    /// No active run
    Idle,
    /// Run started, waiting for the first complete snapshot
    Setup,
    /// Search and rendezvous loop active
    Go,
}

/// Phase of an active search.
///
/// Each phase has a fixed numeric value (the "case") which is what is published on the bus and
/// read back from the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Capture the starting point and decide which search to run
    Init,
    /// Rendezvous gate, held until the peer is also waiting
    Wait,
    /// Expanding square spiral looking for any signal
    SpiralScan,
    /// Line by line hill climb towards maximum power
    LineScan,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Phase {
    /// Numeric value of the phase as published on the bus.
    pub fn case(&self) -> i32 {
        match self {
            Phase::Init => 0,
            Phase::Wait => 1,
            Phase::SpiralScan => 5,
            Phase::LineScan => 10,
        }
    }

    /// Get the phase matching a published numeric value.
    pub fn from_case(case: i32) -> Option<Self> {
        match case {
            0 => Some(Phase::Init),
            1 => Some(Phase::Wait),
            5 => Some(Phase::SpiralScan),
            10 => Some(Phase::LineScan),
            _ => None,
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Init => write!(f, "Init ({})", self.case()),
            Phase::Wait => write!(f, "Wait ({})", self.case()),
            Phase::SpiralScan => write!(f, "SpiralScan ({})", self.case()),
            Phase::LineScan => write!(f, "LineScan ({})", self.case()),
        }
    }
}

impl Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Idle => write!(f, "Idle"),
            LifecycleState::Setup => write!(f, "Setup"),
            LifecycleState::Go => write!(f, "Go"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_case_values() {
        for phase in [Phase::Init, Phase::Wait, Phase::SpiralScan, Phase::LineScan].iter() {
            assert_eq!(Phase::from_case(phase.case()), Some(*phase));
        }

        assert_eq!(Phase::SpiralScan.case(), 5);
        assert_eq!(Phase::LineScan.case(), 10);
        assert_eq!(Phase::from_case(3), None);
    }
}
