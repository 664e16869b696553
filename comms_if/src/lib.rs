//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the alignment software: the messages
//! exchanged with the bus (commands, state snapshots, status publications) and the network layer
//! which carries them.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Control commands sent to the alignment application
pub mod cmd;

/// Command and state definitions for equipment (motors and SFP modules)
pub mod eqpt;

/// Status published by the alignment application
pub mod app;

/// Local and remote state snapshots
pub mod state;

/// Network module
pub mod net;
