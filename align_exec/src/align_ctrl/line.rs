//! # Line scan phase
//!
//! Hill climb along the current direction. At the end of each line the unit yields to the peer
//! through the Wait phase, then either carries on in the same direction (if the end of the line
//! is the best point) or returns to the best point and turns 90 degrees. If eight directions
//! fail to reach alignment the unit settles at the best point and doubles the line length.

use log::{debug, info};
use serde::Serialize;

use super::{planner, Phase, Position, Run, Snapshot, LINE_SCAN_DIRECTIONS};

/// Branch taken by the last line scan dispatch, published for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineBranch {
    /// Power above the alignment threshold, holding position
    Aligned,

    /// Stepping along the current line
    Stepping,

    /// All directions tried, resting at the best point
    SettleAtBest,

    /// Line ended on the best point, carrying on in the same direction
    Continue,

    /// Line ended below the best point, returning to it and turning
    TurnAtBest,
}

pub(super) fn step(run: &mut Run, snapshot: &Snapshot) -> Option<Position> {
    let power_db = snapshot.power_db;

    // The first point of a scan always starts a new best
    if run.progress.point_idx == 0 {
        run.best.reset_to(snapshot.position, power_db);
    } else {
        run.best.offer(snapshot.position, power_db);
    }

    // Aligned, hold here
    if power_db > run.config.max_threshold_db {
        info!(
            "Alignment complete at ({:.3}, {:.3}), {:.1} dB",
            snapshot.position.x, snapshot.position.y, power_db
        );
        run.wanted = snapshot.position;
        run.line_branch = Some(LineBranch::Aligned);
        run.pending_phase = Phase::Wait;
        run.set_phase(Phase::Wait);
        run.progress.reset_scan();
        return None;
    }

    let (branch, target) = if run.progress.point_idx >= run.progress.line_points_per_line {
        run.progress.point_idx = 0;
        run.progress.line_idx += 1;

        run.pending_phase = Phase::LineScan;
        run.set_phase(Phase::Wait);

        if run.progress.line_idx >= LINE_SCAN_DIRECTIONS {
            run.progress.line_idx = 0;
            run.progress.line_points_per_line *= 2;
            run.pending_phase = Phase::Wait;
            info!(
                "No alignment after {} directions, settling at best point ({:.1} dB), {} points \
                 per line",
                LINE_SCAN_DIRECTIONS, run.best.power_db, run.progress.line_points_per_line
            );
            (LineBranch::SettleAtBest, run.best.position)
        } else if power_db >= run.best.power_db {
            // Best point is at the end of the line, keep going
            debug!("Line ended on best point, continuing");
            run.progress.line_idx = 0;
            run.progress.line_points_per_line = run.config.line_initial_points_per_line;
            (
                LineBranch::Continue,
                planner::next_point(snapshot.position, run.progress.angle_rad, run.config.step),
            )
        } else {
            debug!("Line ended below best, returning to best and turning");
            run.progress.angle_rad = planner::rotate_quarter(run.progress.angle_rad);
            (LineBranch::TurnAtBest, run.best.position)
        }
    } else {
        (
            LineBranch::Stepping,
            planner::next_point(snapshot.position, run.progress.angle_rad, run.config.step),
        )
    };

    run.line_branch = Some(branch);
    let cmd = run.move_to(target);
    run.progress.point_idx += 1;

    cmd
}
