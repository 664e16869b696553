//! # Init phase
//!
//! Captures the starting point of a rendezvous episode and chooses the search to run once the
//! peer is ready: a spiral if there is no signal yet, otherwise a line scan straight away.

use log::info;

use super::{Phase, Position, Run, Snapshot};

pub(super) fn step(run: &mut Run, snapshot: &Snapshot) -> Option<Position> {
    run.best.reset_to(snapshot.position, snapshot.power_db);
    run.progress.reset_scan();

    run.pending_phase = if snapshot.power_db < run.config.min_threshold_db {
        Phase::SpiralScan
    } else {
        Phase::LineScan
    };

    info!(
        "Initialisation done at {:.1} dB, next phase: {}",
        snapshot.power_db, run.pending_phase
    );

    run.set_phase(Phase::Wait);

    None
}
