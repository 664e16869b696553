//! # SFP module interface
//!
//! The SFP driver reports diagnostic readings of the optical transceivers, of which only the
//! received power is used by the alignment application.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Last known reading of a single SFP module.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct SfpState {
    /// Received optical power.
    ///
    /// Units: decibels
    pub rx_power_db: f64,
}

/// Wrapper for the SFP driver's section of a state snapshot, `{"sfp": {"<id>": {...}}}`.
///
/// Modules are keyed by their sensor id. The map is ordered so that the "first" module is the one
/// with the lowest id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SfpDriverState {
    pub sfp: BTreeMap<String, SfpState>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SfpDriverState {
    /// Get the reading of the first module, or `None` if no module has reported yet.
    pub fn first(&self) -> Option<&SfpState> {
        self.sfp.values().next()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_first_module() {
        let state: SfpDriverState = serde_json::from_str(
            r#"{"sfp": {"b": {"rx_power_db": -3.0}, "a": {"rx_power_db": 4.5, "tx_power_db": 1}}}"#,
        )
        .unwrap();

        assert_eq!(state.first().map(|s| s.rx_power_db), Some(4.5));
        assert!(SfpDriverState::default().first().is_none());
    }
}
