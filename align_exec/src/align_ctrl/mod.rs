//! # Alignment control module
//!
//! Steers the local unit's two axis actuator to maximise received optical power, coordinating
//! with the controller on the peer unit so the two never scan at the same time.
//!
//! The controller has an outer lifecycle (`Idle`, `Setup`, `Go`) driven by start/stop commands,
//! and while in `Go` runs one of four phases:
//!
//! - `Init` - capture the starting point and pick a search.
//! - `Wait` - the rendezvous gate, held while the peer is scanning.
//! - `SpiralScan` - coarse outward spiral until a signal is found.
//! - `LineScan` - line by line hill climb until the power exceeds the alignment threshold.
//!
//! A phase is only dispatched on ticks where the actuator has reached the last commanded
//! position. A watchdog abandons targets that are never reached.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod best;
mod init;
mod line;
mod params;
mod peer;
mod phase;
mod planner;
mod run;
mod spiral;
mod state;
mod wait;
mod watchdog;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use best::*;
pub use line::LineBranch;
pub use params::*;
pub use peer::{decide, RemotePhase, WaitDecision};
pub use phase::*;
pub use planner::*;
pub use run::*;
pub use state::*;
pub use watchdog::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of spiral legs after which the legs grow.
pub const SPIRAL_LEGS_PER_RING: u32 = 2;

/// Number of line scan directions tried before settling at the best point.
pub const LINE_SCAN_DIRECTIONS: u32 = 8;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during AlignCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum AlignCtrlError {
    #[error("Failed to load AlignCtrl params: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid AlignCtrl parameter: {0}")]
    InvalidParam(String),
}
