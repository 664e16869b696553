//! # Link Simulation
//!
//! A deterministic, in-process model of two units facing each other. Each unit has an actuator
//! which reaches its target a fixed number of ticks after being commanded, and both units receive
//! the same optical power, which falls off quadratically (in dB) with each actuator's distance
//! from its optimum.
//!
//! Statuses published by a unit are seen by its peer on the following tick, as they would be over
//! the bus.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    app::AppStatus,
    cmd::AlignCmd,
    eqpt::{
        motor::{MotorDriverState, MotorMove, MotorState},
        sfp::{SfpDriverState, SfpState},
    },
    state::{LocalState, RemoteState},
};
use log::trace;
use serde::Deserialize;
use util::module::State;

use crate::align_ctrl::{
    AlignCtrl, AlignCtrlError, CmdOutcome, InputData, Params, Position, StatusReport,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Identifier of the simulated SFP module in every unit
const SIM_SFP_ID: &str = "sim0";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of a simulated link.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Number of ticks an actuator takes to reach a commanded target
    pub ticks_per_move: u32,

    pub beam: BeamModel,

    /// Starting positions of the two actuators
    pub start: [Position; 2],
}

/// Received power model of the link.
///
/// `power = peak_db - falloff * (|a - optimum_a|^2 + |b - optimum_b|^2)`, clamped to `floor_db`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BeamModel {
    pub peak_db: f64,
    pub falloff: f64,
    pub floor_db: f64,
    pub optimum: [Position; 2],
}

/// Simulated two axis actuator.
#[derive(Debug, Clone, Copy)]
pub struct SimMotor {
    pub position: Position,
    pub target: Position,

    ticks_per_move: u32,
    remaining_ticks: u32,

    /// A stuck motor accepts commands but never moves
    pub stuck: bool,
}

/// One end of the link.
#[derive(Debug)]
pub struct SimUnit {
    pub ctrl: AlignCtrl,
    pub motor: SimMotor,

    /// Last status published by this unit
    pub status: Option<AppStatus>,
}

/// Two units and the beam between them.
#[derive(Debug)]
pub struct SimLink {
    pub units: [SimUnit; 2],
    pub beam: BeamModel,
    pub num_ticks: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            ticks_per_move: 3,
            beam: BeamModel::default(),
            start: [Position::default(); 2],
        }
    }
}

impl Default for BeamModel {
    fn default() -> Self {
        Self {
            peak_db: 30.0,
            falloff: 0.002,
            floor_db: -40.0,
            optimum: [Position::new(0.0, 100.0), Position::new(-80.0, 0.0)],
        }
    }
}

impl BeamModel {
    /// Power received by both units with the actuators at the given positions.
    pub fn power_db(&self, positions: [Position; 2]) -> f64 {
        let sq_err: f64 = positions
            .iter()
            .zip(self.optimum.iter())
            .map(|(p, o)| (p.x - o.x).powi(2) + (p.y - o.y).powi(2))
            .sum();

        (self.peak_db - self.falloff * sq_err).max(self.floor_db)
    }
}

impl SimMotor {
    pub fn new(position: Position, ticks_per_move: u32) -> Self {
        Self {
            position,
            target: position,
            ticks_per_move,
            remaining_ticks: 0,
            stuck: false,
        }
    }

    /// Command a new target. With zero ticks per move the target is reached immediately.
    pub fn command(&mut self, dems: MotorMove) {
        self.target = Position::new(dems.next_x, dems.next_y);
        self.remaining_ticks = self.ticks_per_move;

        if self.remaining_ticks == 0 && !self.stuck {
            self.position = self.target;
        }
    }

    /// Advance the motor by one tick.
    pub fn step(&mut self) {
        if self.stuck || self.remaining_ticks == 0 {
            return;
        }

        self.remaining_ticks -= 1;
        if self.remaining_ticks == 0 {
            self.position = self.target;
        }
    }

    pub fn driver_state(&self) -> MotorDriverState {
        MotorDriverState {
            motor: MotorState {
                current_x: self.position.x,
                current_y: self.position.y,
                next_x: self.target.x,
                next_y: self.target.y,
            },
        }
    }
}

impl SimLink {
    /// Create a new link with both controllers idle.
    pub fn new(ctrl_params: Params, sim_params: &SimParams) -> Result<Self, AlignCtrlError> {
        let unit = |start: Position| -> Result<SimUnit, AlignCtrlError> {
            Ok(SimUnit {
                ctrl: AlignCtrl::new(ctrl_params.clone())?,
                motor: SimMotor::new(start, sim_params.ticks_per_move),
                status: None,
            })
        };

        Ok(Self {
            units: [unit(sim_params.start[0])?, unit(sim_params.start[1])?],
            beam: sim_params.beam,
            num_ticks: 0,
        })
    }

    /// Current actuator positions.
    pub fn positions(&self) -> [Position; 2] {
        [self.units[0].motor.position, self.units[1].motor.position]
    }

    /// Current received power.
    pub fn power_db(&self) -> f64 {
        self.beam.power_db(self.positions())
    }

    /// Pass a command to one unit's controller.
    pub fn command(&mut self, unit: usize, cmd: &AlignCmd) -> CmdOutcome {
        let local = self.local_state(unit);
        self.units[unit].ctrl.handle_cmd(cmd, &local)
    }

    /// Run one tick of both controllers, then advance the actuators.
    pub fn step(&mut self) -> Result<[StatusReport; 2], AlignCtrlError> {
        // Both units see the state at the start of the tick
        let inputs = [
            InputData {
                local: self.local_state(0),
                remote: self.remote_state(1),
            },
            InputData {
                local: self.local_state(1),
                remote: self.remote_state(0),
            },
        ];

        let (out_a, rpt_a) = self.units[0].ctrl.proc(&inputs[0])?;
        let (out_b, rpt_b) = self.units[1].ctrl.proc(&inputs[1])?;

        for (unit, out) in self.units.iter_mut().zip([out_a, out_b].iter()) {
            if let Some(dems) = out.motor_move {
                unit.motor.command(dems);
            }
            if out.status.is_some() {
                unit.status = out.status;
            }
            unit.motor.step();
        }

        self.num_ticks += 1;
        trace!(
            "Sim tick {}: positions {:?}, power {:.2} dB",
            self.num_ticks,
            self.positions(),
            self.power_db()
        );

        Ok([rpt_a, rpt_b])
    }

    fn local_state(&self, unit: usize) -> LocalState {
        let mut sfp = SfpDriverState::default();
        sfp.sfp.insert(
            SIM_SFP_ID.into(),
            SfpState {
                rx_power_db: self.power_db(),
            },
        );

        LocalState {
            sfp: Some(sfp),
            motors: Some(self.units[unit].motor.driver_state()),
        }
    }

    fn remote_state(&self, unit: usize) -> RemoteState {
        RemoteState {
            motors: Some(self.units[unit].motor.driver_state()),
            app_status: self.units[unit].status,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::align_ctrl::{LifecycleState, Phase, RemotePhase, TickOutcome};

    fn start(step: f64, min_threshold: f64) -> AlignCmd {
        AlignCmd::Start {
            step: Some(step),
            min_threshold: Some(min_threshold),
        }
    }

    /// Only unit A is misaligned and running, unit B sits on its optimum and stays idle.
    fn single_unit_link(ticks_per_move: u32) -> SimLink {
        let beam = BeamModel::default();
        let sim_params = SimParams {
            ticks_per_move,
            beam,
            start: [Position::new(0.0, 0.0), beam.optimum[1]],
        };

        SimLink::new(Params::default(), &sim_params).unwrap()
    }

    #[test]
    fn test_motor() {
        let mut m = SimMotor::new(Position::new(0.0, 0.0), 2);
        m.command(MotorMove {
            next_x: 5.0,
            next_y: 1.0,
        });
        assert_eq!(m.driver_state().motor.next_x, 5.0);

        m.step();
        assert_eq!(m.position, Position::new(0.0, 0.0));
        m.step();
        assert_eq!(m.position, Position::new(5.0, 1.0));

        m.stuck = true;
        m.command(MotorMove {
            next_x: 0.0,
            next_y: 0.0,
        });
        m.step();
        m.step();
        assert_eq!(m.position, Position::new(5.0, 1.0));
    }

    #[test]
    fn test_beam_model() {
        let beam = BeamModel::default();
        assert_eq!(beam.power_db(beam.optimum), beam.peak_db);
        assert!((beam.power_db([Position::new(0.0, 0.0), beam.optimum[1]]) - 10.0).abs() < 1e-9);
        assert_eq!(
            beam.power_db([Position::new(1e4, 0.0), Position::new(0.0, 1e4)]),
            beam.floor_db
        );
    }

    #[test]
    fn test_single_unit_aligns() {
        let mut link = single_unit_link(3);
        assert_eq!(link.command(0, &start(20.0, 0.0)), CmdOutcome::Accepted);

        let mut aligned_at = None;
        for _ in 0..500 {
            let [rpt, idle] = link.step().unwrap();
            assert_eq!(idle.lifecycle, LifecycleState::Idle);

            if rpt.pending_phase == Some(Phase::Wait) {
                aligned_at = Some(link.num_ticks);
                break;
            }
        }
        assert!(aligned_at.is_some(), "unit never aligned");

        // Climbed along +y after the first line along +x failed
        let pos = link.units[0].motor.position;
        assert!(pos.x.abs() < 1e-6);
        assert!((pos.y - 60.0).abs() < 1e-6);
        assert!(link.power_db() > 25.0);

        // Stays put while aligned
        for _ in 0..50 {
            let [rpt, _] = link.step().unwrap();
            assert_eq!(rpt.phase, Some(Phase::Wait));
        }
        assert!((link.units[0].motor.position.y - 60.0).abs() < 1e-6);
        assert_eq!(link.units[0].status, Some(AppStatus { case: 1 }));
    }

    #[test]
    fn test_stuck_motor_recovers() {
        let mut link = single_unit_link(1);
        link.units[0].motor.stuck = true;
        link.command(0, &start(20.0, 0.0));

        let mut fired = false;
        for _ in 0..300 {
            let [rpt, _] = link.step().unwrap();
            if rpt.watchdog_fired {
                fired = true;
                assert!(matches!(rpt.outcome, TickOutcome::Dispatched(_)));
                break;
            }
        }

        assert!(fired);
    }

    #[test]
    fn test_two_units_rendezvous() {
        let sim_params = SimParams::default();
        let mut link = SimLink::new(Params::default(), &sim_params).unwrap();
        let start_power = link.power_db();

        assert_eq!(link.command(0, &start(20.0, 0.0)), CmdOutcome::Accepted);
        assert_eq!(link.command(1, &start(20.0, 0.0)), CmdOutcome::Accepted);

        let mut best_power = start_power;
        for _ in 0..2000 {
            for rpt in link.step().unwrap().iter() {
                // A waiting unit never leaves Wait while its peer is scanning
                if let (
                    TickOutcome::Dispatched(Phase::Wait),
                    Some(RemotePhase::Known(Phase::SpiralScan)),
                )
                | (
                    TickOutcome::Dispatched(Phase::Wait),
                    Some(RemotePhase::Known(Phase::LineScan)),
                ) = (rpt.outcome, rpt.remote_phase)
                {
                    assert_eq!(rpt.phase, Some(Phase::Wait));
                }

                // Only known cases are published
                if let Some(status) = link.units[0].status {
                    assert!(Phase::from_case(status.case).is_some());
                }
            }

            best_power = best_power.max(link.power_db());
        }

        assert_eq!(link.units[0].ctrl.lifecycle(), LifecycleState::Go);
        assert_eq!(link.units[1].ctrl.lifecycle(), LifecycleState::Go);
        assert!(best_power > start_power);
    }

    #[test]
    fn test_shipped_sim_params() {
        let params: SimParams = util::params::load_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../params/align_sim.toml"
        ))
        .unwrap();

        assert_eq!(params.ticks_per_move, 3);
        assert_eq!(params.beam.optimum[1], Position::new(-80.0, 0.0));
    }
}
