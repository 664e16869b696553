//! # Data Store

use comms_if::{
    eqpt::motor::MotorMove,
    state::{LocalState, RemoteState},
};
use log::{debug, info};

use crate::align_ctrl;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Debug, Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// Elapsed time since the start of the session
    pub elapsed_s: f64,

    // AlignCtrl
    pub align_ctrl: align_ctrl::AlignCtrl,

    /// Input to the controller. The snapshots persist between cycles, they are only replaced
    /// when a new one is received.
    pub align_ctrl_input: align_ctrl::InputData,
    pub align_ctrl_output: align_ctrl::OutputData,
    pub align_ctrl_status_rpt: Option<align_ctrl::StatusReport>,

    /// Move command not yet delivered to the motor driver.
    ///
    /// The controller only produces a move once, so it is kept across cycles until it is sent.
    pub pending_move: Option<MotorMove>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Number of consecutive state receive errors
    pub num_consec_state_recv_errors: u64,

    /// Number of consecutive failed attempts to send the pending move
    pub num_consec_move_send_errors: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the outputs of the previous cycle.
    pub fn cycle_start(&mut self) {
        self.align_ctrl_output = align_ctrl::OutputData::default();
        self.align_ctrl_status_rpt = None;

        self.elapsed_s = util::session::get_elapsed_seconds();
    }

    /// Replace the local snapshot with a newer one.
    ///
    /// If the motor driver already reports the pending move as its target the move is dropped.
    pub fn set_local_state(&mut self, local: LocalState) {
        if local.sfp.is_none() || local.motors.is_none() {
            debug!("Received partial local state: {:?}", local);
        }

        if let (Some(pending), Some(motors)) = (self.pending_move, local.motors.as_ref()) {
            if motors.motor.next_x == pending.next_x && motors.motor.next_y == pending.next_y {
                info!("Motor driver already targets the pending move, not resending");
                self.pending_move = None;
                self.num_consec_move_send_errors = 0;
            }
        }

        self.align_ctrl_input.local = local;
    }

    /// Replace the remote snapshot with a newer one.
    pub fn set_remote_state(&mut self, remote: RemoteState) {
        self.align_ctrl_input.remote = remote;
    }

    /// Send the pending move with `send`, including the one produced by the controller this cycle.
    ///
    /// A newer move replaces an undelivered older one. On failure the move stays pending for the
    /// next cycle. Returns `None` if there was nothing to send.
    pub fn send_pending_move<F, E>(&mut self, send: F) -> Option<Result<MotorMove, E>>
    where
        F: FnOnce(MotorMove) -> Result<(), E>,
    {
        if let Some(dems) = self.align_ctrl_output.motor_move {
            self.pending_move = Some(dems);
            self.num_consec_move_send_errors = 0;
        }

        let dems = self.pending_move?;

        match send(dems) {
            Ok(()) => {
                self.pending_move = None;
                self.num_consec_move_send_errors = 0;
                Some(Ok(dems))
            }
            Err(e) => {
                self.num_consec_move_send_errors += 1;
                Some(Err(e))
            }
        }
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::{
        app::AppStatus,
        eqpt::motor::{MotorDriverState, MotorState},
    };

    fn move_to(next_x: f64, next_y: f64) -> MotorMove {
        MotorMove { next_x, next_y }
    }

    #[test]
    fn test_cycle_management() {
        let mut ds = DataStore::default();
        ds.set_remote_state(RemoteState {
            motors: None,
            app_status: Some(AppStatus { case: 5 }),
        });

        ds.align_ctrl_output = align_ctrl::OutputData {
            motor_move: Some(move_to(1.0, 2.0)),
            status: Some(AppStatus { case: 10 }),
        };
        ds.cycle_end();

        assert_eq!(ds.num_cycles, 1);

        // Outputs are cleared, snapshots are kept
        ds.cycle_start();
        assert_eq!(ds.align_ctrl_output, align_ctrl::OutputData::default());
        assert_eq!(
            ds.align_ctrl_input.remote.app_status,
            Some(AppStatus { case: 5 })
        );
    }

    #[test]
    fn test_failed_move_resent_next_cycle() {
        let mut ds = DataStore::default();
        let mut sent = Vec::new();

        // Cycle 1: the controller moves, the driver is not reachable
        ds.cycle_start();
        ds.align_ctrl_output.motor_move = Some(move_to(50.0, 0.0));
        let res = ds.send_pending_move(|m| {
            sent.push(m);
            Err("not connected")
        });
        assert_eq!(res, Some(Err("not connected")));
        assert_eq!(ds.pending_move, Some(move_to(50.0, 0.0)));
        assert_eq!(ds.num_consec_move_send_errors, 1);
        ds.cycle_end();

        // Cycle 2: no new move from the controller, the old one is sent again
        ds.cycle_start();
        assert!(ds.align_ctrl_output.motor_move.is_none());
        let res = ds.send_pending_move(|m| {
            sent.push(m);
            Ok::<(), &str>(())
        });
        assert_eq!(res, Some(Ok(move_to(50.0, 0.0))));
        assert_eq!(sent, vec![move_to(50.0, 0.0), move_to(50.0, 0.0)]);
        assert!(ds.pending_move.is_none());
        assert_eq!(ds.num_consec_move_send_errors, 0);
        ds.cycle_end();

        // Cycle 3: nothing left to send
        ds.cycle_start();
        let res = ds.send_pending_move(|_| -> Result<(), &str> {
            panic!("nothing should be sent")
        });
        assert!(res.is_none());
    }

    #[test]
    fn test_newer_move_replaces_undelivered() {
        let mut ds = DataStore::default();

        ds.align_ctrl_output.motor_move = Some(move_to(10.0, 0.0));
        assert!(ds.send_pending_move(|_| Err(())).unwrap().is_err());

        ds.cycle_start();
        ds.align_ctrl_output.motor_move = Some(move_to(20.0, 0.0));
        let res = ds.send_pending_move(|_| Ok::<(), ()>(()));
        assert_eq!(res, Some(Ok(move_to(20.0, 0.0))));
        assert!(ds.pending_move.is_none());
    }

    #[test]
    fn test_pending_move_dropped_once_driver_reports_it() {
        let mut ds = DataStore::default();

        ds.align_ctrl_output.motor_move = Some(move_to(10.0, -5.0));
        assert!(ds.send_pending_move(|_| Err(())).unwrap().is_err());

        let driver = |next_x, next_y| LocalState {
            sfp: None,
            motors: Some(MotorDriverState {
                motor: MotorState {
                    current_x: 0.0,
                    current_y: 0.0,
                    next_x,
                    next_y,
                },
            }),
        };

        // Driver still targets something else
        ds.set_local_state(driver(0.0, 0.0));
        assert!(ds.pending_move.is_some());

        ds.set_local_state(driver(10.0, -5.0));
        assert!(ds.pending_move.is_none());
        assert_eq!(ds.num_consec_move_send_errors, 0);
    }
}
