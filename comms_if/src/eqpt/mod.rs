//! # Equipment Interface
//!
//! This module defines the structures exchanged with the equipment drivers on the bus.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod motor;
pub mod sfp;
