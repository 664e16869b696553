//! # Alignment Executive Parameters
//!
//! This module provide parameters for the alignment executive.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecParams {
    /// Target period of one cycle of the executive
    pub cycle_period_s: f64,

    /// Number of consecutive cycle overruns after which an error is logged
    pub max_consec_cycle_overruns: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.1,
            max_consec_cycle_overruns: 50,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_params() {
        let p: ExecParams = util::params::from_str("cycle_period_s = 0.5").unwrap();
        assert_eq!(p.cycle_period_s, 0.5);
        assert_eq!(p.max_consec_cycle_overruns, 50);
    }
}
