//! # Command processor module
//!
//! The command processor passes received commands to the controller.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};

// Internal
use align_lib::{align_ctrl::CmdOutcome, data_store::DataStore};
use comms_if::cmd::AlignCmd;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a command.
///
/// Commands take effect immediately, the controller sees the new lifecycle state on the next
/// tick.
pub(crate) fn exec(ds: &mut DataStore, cmd: &AlignCmd) {
    debug!("Recieved {:?} command", cmd);

    match ds.align_ctrl.handle_cmd(cmd, &ds.align_ctrl_input.local) {
        CmdOutcome::Accepted => info!(
            "Command accepted, AlignCtrl now {}",
            ds.align_ctrl.lifecycle()
        ),
        CmdOutcome::Ignored => info!(
            "Command ignored, AlignCtrl is {}",
            ds.align_ctrl.lifecycle()
        ),
    }
}
