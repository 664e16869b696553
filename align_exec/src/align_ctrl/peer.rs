//! Peer coordination
//!
//! The two units of a link must not scan at the same time, otherwise each sees the power change
//! due to the other's motion. Before leaving the Wait phase the local unit checks the phase last
//! published by the peer and only proceeds if the peer is waiting too (or has never published).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::state::RemoteState;
use serde::Serialize;

use super::Phase;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Last phase published by the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemotePhase {
    /// The peer has not published a status yet
    Unknown,
    /// The peer published a known phase
    Known(Phase),
    /// The peer published a value which isn't a known phase
    Unrecognised(i32),
}

/// Result of the rendezvous check in the Wait phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitDecision {
    /// Leave Wait for the given phase
    Proceed(Phase),
    /// Stay in Wait because the peer is still active
    PeerBusy(RemotePhase),
    /// Stay in Wait because the link is aligned
    Aligned,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RemotePhase {
    pub fn from_remote(remote: &RemoteState) -> Self {
        match remote.app_status {
            None => RemotePhase::Unknown,
            Some(s) => match Phase::from_case(s.case) {
                Some(p) => RemotePhase::Known(p),
                None => RemotePhase::Unrecognised(s.case),
            },
        }
    }

    /// Returns true if the peer is in a state which allows the local unit to move.
    pub fn allows_motion(&self) -> bool {
        matches!(self, RemotePhase::Unknown | RemotePhase::Known(Phase::Wait))
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Decide whether the local unit may leave the Wait phase.
///
/// - `pending`: the phase to resume once cleared. If this is `Wait` the unit is resting at an
///   aligned point and only resumes (in `resume_phase`) if power drops below `max_threshold_db`.
pub fn decide(
    remote: RemotePhase,
    pending: Phase,
    power_db: f64,
    max_threshold_db: f64,
    resume_phase: Phase,
) -> WaitDecision {
    if !remote.allows_motion() {
        return WaitDecision::PeerBusy(remote);
    }

    if pending != Phase::Wait {
        WaitDecision::Proceed(pending)
    } else if power_db < max_threshold_db {
        WaitDecision::Proceed(resume_phase)
    } else {
        WaitDecision::Aligned
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::app::AppStatus;

    fn remote(case: Option<i32>) -> RemoteState {
        RemoteState {
            motors: None,
            app_status: case.map(|case| AppStatus { case }),
        }
    }

    #[test]
    fn test_remote_phase() {
        assert_eq!(RemotePhase::from_remote(&remote(None)), RemotePhase::Unknown);
        assert_eq!(
            RemotePhase::from_remote(&remote(Some(5))),
            RemotePhase::Known(Phase::SpiralScan)
        );
        assert_eq!(
            RemotePhase::from_remote(&remote(Some(7))),
            RemotePhase::Unrecognised(7)
        );
    }

    #[test]
    fn test_peer_scanning_holds() {
        let peer = RemotePhase::Known(Phase::SpiralScan);
        assert_eq!(
            decide(peer, Phase::LineScan, 10.0, 25.0, Phase::SpiralScan),
            WaitDecision::PeerBusy(peer)
        );

        let peer = RemotePhase::Unrecognised(42);
        assert_eq!(
            decide(peer, Phase::LineScan, 10.0, 25.0, Phase::SpiralScan),
            WaitDecision::PeerBusy(peer)
        );
    }

    #[test]
    fn test_peer_waiting_proceeds() {
        for peer in [RemotePhase::Unknown, RemotePhase::Known(Phase::Wait)].iter() {
            assert_eq!(
                decide(*peer, Phase::LineScan, 10.0, 25.0, Phase::SpiralScan),
                WaitDecision::Proceed(Phase::LineScan)
            );
        }
    }

    #[test]
    fn test_resting_unit() {
        let peer = RemotePhase::Known(Phase::Wait);

        // Still aligned
        assert_eq!(
            decide(peer, Phase::Wait, 26.0, 25.0, Phase::SpiralScan),
            WaitDecision::Aligned
        );
        assert_eq!(
            decide(peer, Phase::Wait, 25.0, 25.0, Phase::SpiralScan),
            WaitDecision::Aligned
        );

        // Power dropped
        assert_eq!(
            decide(peer, Phase::Wait, 24.0, 25.0, Phase::SpiralScan),
            WaitDecision::Proceed(Phase::SpiralScan)
        );
        assert_eq!(
            decide(peer, Phase::Wait, 24.0, 25.0, Phase::LineScan),
            WaitDecision::Proceed(Phase::LineScan)
        );
    }
}
