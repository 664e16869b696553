//! Implementations for the AlignCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use comms_if::{
    app::AppStatus,
    cmd::AlignCmd,
    eqpt::motor::MotorMove,
    state::{LocalState, RemoteState},
};
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::{
    init, line, spiral, wait, AlignCtrlError, BestPosition, LifecycleState, LineBranch, Params,
    Phase, Position, RemotePhase, Run, RunSetup, ScanConfig, Snapshot,
};
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Alignment control module state
#[derive(Debug, Default)]
pub struct AlignCtrl {
    pub(crate) params: Params,

    lifecycle: Lifecycle,
}

/// Input data to alignment control for one tick.
#[derive(Debug, Default, Clone)]
pub struct InputData {
    /// Last known state of the local unit
    pub local: LocalState,

    /// Last known state of the remote unit
    pub remote: RemoteState,
}

/// Output of one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OutputData {
    /// Move command for the motor driver, if a new target was chosen
    pub motor_move: Option<MotorMove>,

    /// Status publication, present on every dispatched tick
    pub status: Option<AppStatus>,
}

/// Status report for AlignCtrl processing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusReport {
    pub lifecycle: LifecycleState,
    pub outcome: TickOutcome,

    /// Phase which will run on the next dispatch
    pub phase: Option<Phase>,
    pub pending_phase: Option<Phase>,

    /// Phase last published by the peer, only evaluated in Go
    pub remote_phase: Option<RemotePhase>,

    /// True if the stall watchdog abandoned the wanted position on this tick
    pub watchdog_fired: bool,
    pub stall_count: u32,

    pub wanted: Option<Position>,
    pub best: Option<BestPosition>,

    /// Line scan branch taken, only set on ticks which dispatched the line scan
    pub line_branch: Option<LineBranch>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Lifecycle of the controller, carrying the data valid in each state.
#[derive(Debug, Clone, PartialEq)]
enum Lifecycle {
    Idle,
    Setup(RunSetup),
    Go(Box<Run>),
}

/// What happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TickOutcome {
    /// No run active
    Idle,
    /// A snapshot required for this lifecycle state is missing, nothing was done
    NotReady,
    /// Entered Go from Setup
    Started,
    /// The actuator hasn't reached the wanted position yet
    Moving,
    /// The actuator arrived and the phase was run
    Dispatched(Phase),
}

/// Effect of a command on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdOutcome {
    Accepted,
    /// The command isn't valid in the current lifecycle state
    Ignored,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::Idle
    }
}

impl Lifecycle {
    fn state(&self) -> LifecycleState {
        match self {
            Lifecycle::Idle => LifecycleState::Idle,
            Lifecycle::Setup(_) => LifecycleState::Setup,
            Lifecycle::Go(_) => LifecycleState::Go,
        }
    }
}

impl State for AlignCtrl {
    type InitData = &'static str;
    type InitError = AlignCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = AlignCtrlError;

    /// Initialise the AlignCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: &Session,
    ) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data).map_err(AlignCtrlError::ParamLoadError)?;
        params.validate()?;

        info!("AlignCtrl params: {:?}", params);

        self.params = params;
        self.lifecycle = Lifecycle::Idle;

        Ok(())
    }

    /// Perform one tick of alignment control.
    ///
    /// Never fails, missing snapshots are reported as [`TickOutcome::NotReady`].
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let mut output = OutputData::default();
        let mut watchdog_fired = false;
        let mut remote_phase = None;

        let outcome = match self.lifecycle {
            Lifecycle::Idle => TickOutcome::Idle,

            Lifecycle::Setup(setup) => match Snapshot::from_local(&input_data.local) {
                Some(snapshot) => {
                    info!(
                        "Snapshots available, holding at ({:.3}, {:.3}) and entering Go",
                        snapshot.position.x, snapshot.position.y
                    );
                    self.lifecycle = Lifecycle::Go(Box::new(Run::start(setup, &snapshot)));
                    TickOutcome::Started
                }
                None => {
                    trace!("Setup waiting for motor and SFP state");
                    TickOutcome::NotReady
                }
            },

            Lifecycle::Go(ref mut run) => {
                let snapshot = match Snapshot::from_local(&input_data.local) {
                    Some(s) if input_data.remote.motors.is_some() => Some(s),
                    _ => None,
                };

                match snapshot {
                    Some(snapshot) => {
                        let remote = RemotePhase::from_remote(&input_data.remote);
                        remote_phase = Some(remote);

                        let (dispatched, fired) = go_tick(&self.params, run, &snapshot, remote);
                        watchdog_fired = fired;

                        match dispatched {
                            Some((out, phase)) => {
                                output = out;
                                TickOutcome::Dispatched(phase)
                            }
                            None => TickOutcome::Moving,
                        }
                    }
                    None => {
                        trace!("Go waiting for local and remote state");
                        TickOutcome::NotReady
                    }
                }
            }
        };

        let report = self.report(outcome, remote_phase, watchdog_fired);

        Ok((output, report))
    }
}

impl AlignCtrl {
    /// Create a new controller from already loaded parameters.
    pub fn new(params: Params) -> Result<Self, AlignCtrlError> {
        params.validate()?;

        Ok(Self {
            params,
            lifecycle: Lifecycle::Idle,
        })
    }

    /// Handle a control command.
    ///
    /// `local` is the last known local state, used to capture the initial position on start.
    /// Commands which are not valid in the current lifecycle state are ignored.
    pub fn handle_cmd(&mut self, cmd: &AlignCmd, local: &LocalState) -> CmdOutcome {
        match (cmd, &self.lifecycle) {
            (
                AlignCmd::Start {
                    step,
                    min_threshold,
                },
                Lifecycle::Idle,
            ) => {
                let config = ScanConfig::from_cmd(&self.params, *step, *min_threshold);
                let initial_position = local
                    .motors
                    .as_ref()
                    .map(|m| Position::new(m.motor.current_x, m.motor.current_y));

                info!(
                    "Got start command step={} min_threshold={} dB (max_threshold={} dB, \
                     distance={})",
                    config.step, config.min_threshold_db, config.max_threshold_db, config.distance
                );
                debug!("Initial position: {:?}", initial_position);

                self.lifecycle = Lifecycle::Setup(RunSetup {
                    config,
                    initial_position,
                });
                CmdOutcome::Accepted
            }
            (AlignCmd::Stop, Lifecycle::Go(_)) => {
                info!("Got stop command, run abandoned");
                self.lifecycle = Lifecycle::Idle;
                CmdOutcome::Accepted
            }
            (cmd, lifecycle) => {
                debug!("Ignoring {:?} while {}", cmd, lifecycle.state());
                CmdOutcome::Ignored
            }
        }
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// The active run, if the controller is in Go.
    pub fn run(&self) -> Option<&Run> {
        match &self.lifecycle {
            Lifecycle::Go(run) => Some(run.as_ref()),
            _ => None,
        }
    }

    fn report(
        &self,
        outcome: TickOutcome,
        remote_phase: Option<RemotePhase>,
        watchdog_fired: bool,
    ) -> StatusReport {
        let run = self.run();

        StatusReport {
            lifecycle: self.lifecycle.state(),
            outcome,
            phase: run.map(|r| r.phase),
            pending_phase: run.map(|r| r.pending_phase),
            remote_phase,
            watchdog_fired,
            stall_count: run.map_or(0, |r| r.watchdog.count()),
            wanted: run.map(|r| r.wanted),
            best: run.map(|r| r.best),
            line_branch: match outcome {
                TickOutcome::Dispatched(Phase::LineScan) => run.and_then(|r| r.line_branch),
                _ => None,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Run the arrival gate and, if the actuator has arrived, the active phase.
///
/// Returns the tick's output and the phase which was run if dispatched, and whether the watchdog
/// fired.
fn go_tick(
    params: &Params,
    run: &mut Run,
    snapshot: &Snapshot,
    remote: RemotePhase,
) -> (Option<(OutputData, Phase)>, bool) {
    if run.watchdog.take_latch() {
        debug!(
            "Moving from ({:.3}, {:.3}) to ({:.3}, {:.3})",
            snapshot.position.x, snapshot.position.y, run.wanted.x, run.wanted.y
        );
    }

    let fired = run.watchdog.tick();
    if fired {
        warn!(
            "Actuator did not reach ({:.3}, {:.3}) within {} ticks, holding current position \
             ({:.3}, {:.3})",
            run.wanted.x,
            run.wanted.y,
            run.config.stall_limit_ticks,
            snapshot.position.x,
            snapshot.position.y
        );
        run.wanted = snapshot.position;
    }

    if !snapshot
        .position
        .reached(&run.wanted, params.arrival_tolerance)
    {
        return (None, fired);
    }

    run.watchdog.arrived();

    let phase = run.phase;

    debug!(
        "Phase: {}, pending: {}, line: {}, point: {}, X: {:.3}, Y: {:.3}, RX: {:.2} dB",
        phase,
        run.pending_phase,
        run.progress.line_idx,
        run.progress.point_idx,
        snapshot.position.x,
        snapshot.position.y,
        snapshot.power_db
    );

    let target = match phase {
        Phase::Init => init::step(run, snapshot),
        Phase::Wait => wait::step(run, snapshot, remote),
        Phase::SpiralScan => spiral::step(run, snapshot),
        Phase::LineScan => line::step(run, snapshot),
    };

    let output = OutputData {
        motor_move: target.map(|t| MotorMove {
            next_x: t.x,
            next_y: t.y,
        }),
        status: Some(AppStatus { case: phase.case() }),
    };

    (Some((output, phase)), fired)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
