//! # Alignment library.
//!
//! This library allows other crates in the workspace to access items defined inside the alignment
//! executive crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Alignment control module - steers the actuator to maximise received power
pub mod align_ctrl;

/// Command client - recieves start/stop commands
pub mod cmd_client;

/// Global data store of the executive
pub mod data_store;

/// Motor client - sends move commands to the motor driver
pub mod motor_client;

/// Parameters of the executive
pub mod params;

/// In-process simulation of a two unit link
pub mod sim;

/// State client - recieves local and remote state snapshots
pub mod state_client;

/// Status server - publishes the application status
pub mod status_server;
