//! # Alignment Simulation
//!
//! This binary runs two alignment controllers against a simulated link, without requiring the
//! bus or the physical units. It is designed to allow quick development and tuning of the
//! alignment parameters.
//!
//! Usage: `align_sim [NUM_TICKS]`

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::env;

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use comms_if::cmd::AlignCmd;
use log::{debug, info};

use align_lib::{
    align_ctrl::{CmdOutcome, Params, Phase},
    sim::{SimLink, SimParams},
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of ticks simulated if not given on the command line
const DEFAULT_NUM_TICKS: u64 = 5000;

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    let session = Session::new("align_sim", "sessions").wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Alignment Simulation\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- ARGUMENTS ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let num_ticks = match args.len() {
        1 => DEFAULT_NUM_TICKS,
        2 => args[1]
            .parse::<u64>()
            .wrap_err("Expected the number of ticks as the only argument")?,
        n => return Err(eyre!("Expected zero or one argument, found {}", n - 1)),
    };

    // ---- LOAD PARAMETERS ----

    let ctrl_params: Params =
        util::params::load("align_ctrl.toml").wrap_err("Could not load AlignCtrl params")?;
    let sim_params: SimParams =
        util::params::load("align_sim.toml").wrap_err("Could not load sim params")?;

    info!("Simulation parameters: {:#?}", sim_params);

    // ---- MODULE INIT ----

    let mut link = SimLink::new(ctrl_params, &sim_params).wrap_err("Invalid AlignCtrl params")?;

    let start = AlignCmd::Start {
        step: None,
        min_threshold: None,
    };
    for unit in 0..2 {
        if link.command(unit, &start) != CmdOutcome::Accepted {
            return Err(eyre!("Unit {} did not accept the start command", unit));
        }
    }

    info!(
        "Starting from {:?}, link power {:.2} dB",
        link.positions(),
        link.power_db()
    );

    // ---- MAIN LOOP ----

    let mut phases: [Option<Phase>; 2] = [None, None];
    let mut best_power_db = link.power_db();

    for _ in 0..num_ticks {
        let reports = link.step().wrap_err("Error stepping the simulated link")?;

        for (unit, rpt) in reports.iter().enumerate() {
            if rpt.phase != phases[unit] {
                info!(
                    "[{}] Unit {} in {:?} at {:?}, link power {:.2} dB",
                    link.num_ticks,
                    unit,
                    rpt.phase,
                    link.units[unit].motor.position,
                    link.power_db()
                );
                phases[unit] = rpt.phase;
            }

            if rpt.watchdog_fired {
                info!("[{}] Unit {} stall watchdog fired", link.num_ticks, unit);
            }
        }

        best_power_db = best_power_db.max(link.power_db());
    }

    // ---- SHUTDOWN ----

    info!(
        "End of simulation after {} ticks: positions {:?}, link power {:.2} dB (best {:.2} dB, \
         peak {:.2} dB)",
        link.num_ticks,
        link.positions(),
        link.power_db(),
        best_power_db,
        link.beam.peak_db
    );

    Ok(())
}
