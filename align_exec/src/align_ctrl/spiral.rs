//! # Spiral scan phase
//!
//! Traces an outward square spiral from the starting point until any signal is received. Each
//! leg has `spiral_points_per_line` points, the direction turns 90 degrees after every leg, and
//! every two legs the legs grow by two points.

use log::{debug, info};

use super::{planner, Phase, Position, Run, Snapshot, SPIRAL_LEGS_PER_RING};

pub(super) fn step(run: &mut Run, snapshot: &Snapshot) -> Option<Position> {
    let target = planner::next_point(
        snapshot.position,
        run.progress.angle_rad,
        run.config.step,
    );
    let cmd = run.move_to(target);

    run.best.offer(snapshot.position, snapshot.power_db);

    let progress = &mut run.progress;
    progress.point_idx += 1;

    // End of the leg
    if progress.point_idx >= progress.spiral_points_per_line {
        progress.point_idx = 0;
        progress.angle_rad = planner::rotate_quarter(progress.angle_rad);
        progress.line_idx += 1;
    }

    // End of the ring
    if progress.line_idx >= SPIRAL_LEGS_PER_RING {
        progress.line_idx = 0;
        progress.spiral_points_per_line += 2;
        debug!(
            "Increase spiral points per line: {}",
            progress.spiral_points_per_line
        );
    }

    if snapshot.power_db > run.config.min_threshold_db {
        info!(
            "Found optical power ({:.1} dB), line scan after rendezvous",
            snapshot.power_db
        );
        run.pending_phase = Phase::LineScan;
        run.set_phase(Phase::Wait);
        run.progress.reset_scan();
    }

    cmd
}
