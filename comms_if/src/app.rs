//! # Application status
//!
//! The alignment application publishes its current phase on every dispatched tick as
//! `{"case": <n>}`. The peer unit reads it through its remote state snapshot.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Status publication of the alignment application.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppStatus {
    /// Numeric value of the phase the application was in when it published.
    pub case: i32,
}
