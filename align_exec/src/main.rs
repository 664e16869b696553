//! Main alignment executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Command processing and handling
//!         - State snapshot acquisition (local and remote unit)
//!         - Alignment control processing
//!         - Motor command output
//!         - Status publication
//!
//! # Modules
//!
//! All modules (e.g. `align_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use align_lib::{
    cmd_client::{CmdClient, CmdClientError},
    data_store::DataStore,
    motor_client::{MotorClient, MotorClientError},
    params::ExecParams,
    state_client::StateClient,
    status_server::StatusServer,
};
use comms_if::{
    cmd::CmdResponse,
    net::NetParams,
    state::{LocalState, RemoteState},
};

mod cmd_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, error, info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Limit of the number of consecutive state recieve errors before an error is logged.
const MAX_STATE_RECV_ERROR_LIMIT: u64 = 5;

/// Limit of the number of consecutive failed move sends before an error is logged.
const MAX_MOVE_SEND_ERROR_LIMIT: u64 = 50;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("align_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("KORUZA Alignment Executable\n");
    info!(
        "Running on: {}",
        host::get_hostname().unwrap_or_else(|| String::from("unknown host"))
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;

    let exec_params: ExecParams =
        util::params::load("align_exec.toml").wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");
    debug!("{:?}", exec_params);

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.align_ctrl
        .init("align_ctrl.toml", &session)
        .wrap_err("Failed to initialise AlignCtrl")?;
    info!("AlignCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let zmq_ctx = comms_if::net::zmq::Context::new();

    let mut cmd_client = {
        let c = CmdClient::new(&zmq_ctx, &net_params).wrap_err("Failed to initialise CmdClient")?;
        info!("CmdClient initialised");
        c
    };

    let local_client = {
        let c = StateClient::<LocalState>::new(&zmq_ctx, &net_params.local_state_endpoint)
            .wrap_err("Failed to initialise the local StateClient")?;
        info!("Local StateClient initialised");
        c
    };

    let remote_client = {
        let c = StateClient::<RemoteState>::new(&zmq_ctx, &net_params.remote_state_endpoint)
            .wrap_err("Failed to initialise the remote StateClient")?;
        info!("Remote StateClient initialised");
        c
    };

    let motor_client = {
        let c =
            MotorClient::new(&zmq_ctx, &net_params).wrap_err("Failed to initialise MotorClient")?;
        info!("MotorClient initialised");
        c
    };

    let mut status_server = {
        let s = StatusServer::new(&zmq_ctx, &net_params)
            .wrap_err("Failed to initialise StatusServer")?;
        info!("StatusServer initialised");
        s
    };

    info!("Network initialisation complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut local_connected = false;
    let mut remote_connected = false;
    let mut motor_connected = false;

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start();

        // ---- COMMAND PROCESSING ----

        // Get commands until none remain
        loop {
            match cmd_client.recieve_cmd() {
                Ok(Some(cmd)) => {
                    cmd_processor::exec(&mut ds, &cmd);

                    if let Err(e) = cmd_client.send_response(CmdResponse::Ok) {
                        warn!("Could not respond to command: {}", e)
                    }
                }
                Ok(None) => break,
                // Unparsable commands are answered by the client and ignored
                Err(CmdClientError::CmdParseError(e)) => {
                    warn!("Ignoring command: {}", e);
                }
                Err(CmdClientError::NonUtf8Request) => {
                    warn!("Ignoring non UTF-8 command");
                }
                Err(e) => {
                    warn!("Error recieving commands: {}", e);
                    break;
                }
            }
        }

        // ---- DATA INPUT ----

        log_connection_change("local state", local_client.is_connected(), &mut local_connected);
        log_connection_change(
            "remote state",
            remote_client.is_connected(),
            &mut remote_connected,
        );
        log_connection_change("motor driver", motor_client.is_connected(), &mut motor_connected);

        let mut state_ok = true;

        match local_client.recieve_latest() {
            Ok(Some(l)) => ds.set_local_state(l),
            Ok(None) => (),
            Err(e) => {
                warn!("Could not recieve local state: {}", e);
                state_ok = false;
            }
        }

        match remote_client.recieve_latest() {
            Ok(Some(r)) => ds.set_remote_state(r),
            Ok(None) => (),
            Err(e) => {
                warn!("Could not recieve remote state: {}", e);
                state_ok = false;
            }
        }

        if state_ok {
            ds.num_consec_state_recv_errors = 0;
        } else {
            ds.num_consec_state_recv_errors += 1;
            if ds.num_consec_state_recv_errors == MAX_STATE_RECV_ERROR_LIMIT {
                error!(
                    "Maximum number of consecutive state recieve errors ({}) reached",
                    MAX_STATE_RECV_ERROR_LIMIT
                );
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        match ds.align_ctrl.proc(&ds.align_ctrl_input) {
            Ok((o, r)) => {
                ds.align_ctrl_output = o;
                ds.align_ctrl_status_rpt = Some(r);
            }
            Err(e) => warn!("Error during AlignCtrl processing: {}", e),
        };

        // Send demands to the motor driver, a move which can't be sent is retried next cycle
        match ds.send_pending_move(|dems| motor_client.send_move(dems)) {
            Some(Ok(dems)) => debug!("Move command sent: ({}, {})", dems.next_x, dems.next_y),
            Some(Err(MotorClientError::NotConnected)) => {
                if ds.num_consec_move_send_errors == 1 {
                    warn!("Motor driver not connected, move command held until it connects")
                }
            }
            Some(Err(e)) => warn!("MotorClient error, move command will be resent: {}", e),
            None => (),
        }

        if ds.num_consec_move_send_errors == MAX_MOVE_SEND_ERROR_LIMIT {
            error!(
                "Move command could not be delivered for {} consecutive cycles",
                MAX_MOVE_SEND_ERROR_LIMIT
            );
        }

        // ---- STATUS ----

        if let Err(e) = status_server.send(&ds) {
            warn!("StatusServer error: {}", e)
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - exec_params.cycle_period_s
                );
                ds.num_consec_cycle_overruns += 1;

                if ds.num_consec_cycle_overruns == exec_params.max_consec_cycle_overruns {
                    error!(
                        "{} consecutive cycle overruns",
                        exec_params.max_consec_cycle_overruns
                    );
                }
            }
        }

        ds.cycle_end();
    }
}

/// Log a change in the connection status of one of the clients.
fn log_connection_change(name: &str, connected: bool, was_connected: &mut bool) {
    if connected != *was_connected {
        if connected {
            info!("Connected to {}", name);
        } else {
            warn!("Disconnected from {}", name);
        }
        *was_connected = connected;
    }
}
