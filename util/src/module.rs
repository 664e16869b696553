//! Module interfaces
//!
//! Every cyclic control module in `align_exec` exposes its state through the [`State`] trait, so
//! that the executive can initialise it from a parameter file and then step it once per cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// The module's internal state.
pub trait State {
    /// Data required during initialisation, usually a parameter file path.
    type InitData;
    /// An error which can occur during initialisation.
    type InitError;

    /// Snapshot of the inputs consumed by one cycle.
    type InputData;
    /// Commands or publications produced by one cycle.
    type OutputData;
    /// A report on what happened during the cycle.
    type StatusReport;
    /// An error which can occur during cyclic processing.
    type ProcError;

    /// Initialise the module.
    ///
    /// Must be called before the first call to [`State::proc`].
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one cycle of the module.
    ///
    /// Inputs are read only for the duration of the call. On success the cycle's output and
    /// status report are returned.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
