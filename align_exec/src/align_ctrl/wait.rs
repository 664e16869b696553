//! # Wait phase
//!
//! The rendezvous gate. No motion is commanded while waiting.

use log::{debug, info, trace};

use super::{peer, Position, RemotePhase, Run, Snapshot};

pub(super) fn step(run: &mut Run, snapshot: &Snapshot, remote: RemotePhase) -> Option<Position> {
    match peer::decide(
        remote,
        run.pending_phase,
        snapshot.power_db,
        run.config.max_threshold_db,
        run.config.resume_phase,
    ) {
        peer::WaitDecision::Proceed(next) => {
            if next == run.pending_phase {
                debug!("Peer is {:?}, proceeding to {}", remote, next);
            } else {
                info!(
                    "Power declined to {:.1} dB, resuming scanning in {}",
                    snapshot.power_db, next
                );
            }
            run.set_phase(next);
        }
        peer::WaitDecision::PeerBusy(p) => trace!("Peer is active ({:?}), waiting", p),
        peer::WaitDecision::Aligned => trace!("Aligned at {:.1} dB, waiting", snapshot.power_db),
    }

    None
}
