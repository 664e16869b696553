//! Per-run controller state
//!
//! Everything in this module is created by a start command and dropped by a stop command, so no
//! state survives from one run to the next.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::state::LocalState;
use log::info;
use serde::Serialize;

use super::{BestPosition, LineBranch, Params, Phase, Position, StallWatchdog};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Configuration of a run, fixed from the start command until the run ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanConfig {
    /// Units: actuator units
    pub step: f64,

    /// Power above which a signal is considered acquired.
    ///
    /// Units: decibels
    pub min_threshold_db: f64,

    /// Power above which the link is considered aligned.
    ///
    /// Units: decibels
    pub max_threshold_db: f64,

    /// Distance between the units. Not used by the search.
    pub distance: f64,

    pub spiral_initial_points_per_line: u32,
    pub line_initial_points_per_line: u32,
    pub resume_phase: Phase,
    pub stall_limit_ticks: u32,
}

/// Counters of the scan in progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanProgress {
    /// Direction of the current line or spiral leg.
    ///
    /// Units: radians
    pub angle_rad: f64,

    /// Points per leg of the current spiral ring
    pub spiral_points_per_line: u32,

    /// Points per line of the line scan
    pub line_points_per_line: u32,

    /// Index of the current line (or spiral leg)
    pub line_idx: u32,

    /// Index of the current point along the line
    pub point_idx: u32,
}

/// Data captured by the start command, held while waiting for the first complete snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSetup {
    pub config: ScanConfig,
    pub initial_position: Option<Position>,
}

/// Everything the controller owns while in the Go lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub config: ScanConfig,
    pub progress: ScanProgress,
    pub best: BestPosition,
    pub watchdog: StallWatchdog,

    /// Phase handled on the next dispatched tick
    pub phase: Phase,

    /// Phase to resume once the rendezvous gate clears
    pub pending_phase: Phase,

    /// Target the actuator is currently commanded towards
    pub wanted: Position,

    /// Actuator position when the start command was received, if known
    pub initial_position: Option<Position>,

    /// Branch taken by the most recent line scan dispatch
    pub line_branch: Option<LineBranch>,
}

/// The inputs of one tick that the phases need from the local unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub position: Position,

    /// Units: decibels
    pub power_db: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScanConfig {
    /// Build the run configuration from the start command's values, using the parameter defaults
    /// for anything not given.
    pub fn from_cmd(params: &Params, step: Option<f64>, min_threshold_db: Option<f64>) -> Self {
        Self {
            step: step.unwrap_or(params.default_step),
            min_threshold_db: min_threshold_db.unwrap_or(params.default_min_threshold_db),
            max_threshold_db: params.max_threshold_db,
            distance: params.distance,
            spiral_initial_points_per_line: params.spiral_initial_points_per_line,
            line_initial_points_per_line: params.line_initial_points_per_line,
            resume_phase: params.resume_phase,
            stall_limit_ticks: params.stall_limit_ticks,
        }
    }
}

impl ScanProgress {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            angle_rad: 0.0,
            spiral_points_per_line: config.spiral_initial_points_per_line,
            line_points_per_line: config.line_initial_points_per_line,
            line_idx: 0,
            point_idx: 0,
        }
    }

    /// Reset the direction and the line/point counters. Points per line are kept.
    pub fn reset_scan(&mut self) {
        self.angle_rad = 0.0;
        self.line_idx = 0;
        self.point_idx = 0;
    }
}

impl Run {
    /// Enter Go, holding the actuator at its current position.
    pub fn start(setup: RunSetup, snapshot: &Snapshot) -> Self {
        Self {
            config: setup.config,
            progress: ScanProgress::new(&setup.config),
            best: BestPosition::new(snapshot.position, snapshot.power_db),
            watchdog: StallWatchdog::new(setup.config.stall_limit_ticks),
            phase: Phase::Init,
            pending_phase: Phase::Init,
            wanted: snapshot.position,
            initial_position: setup.initial_position,
            line_branch: None,
        }
    }

    /// Change the phase handled on the next dispatch.
    pub fn set_phase(&mut self, phase: Phase) {
        if phase != self.phase {
            info!("AlignCtrl phase change: {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Command a move to `target`, returning the target to be sent to the motor driver.
    pub fn move_to(&mut self, target: Position) -> Option<Position> {
        self.wanted = target;
        Some(target)
    }
}

impl Snapshot {
    /// Extract the snapshot from the local state, or `None` if the motor or SFP drivers have not
    /// reported yet.
    pub fn from_local(local: &LocalState) -> Option<Self> {
        let motor = local.motors.as_ref()?.motor;
        let sfp = local.sfp.as_ref()?.first()?;

        Some(Self {
            position: Position::new(motor.current_x, motor.current_y),
            power_db: sfp.rx_power_db,
        })
    }
}
