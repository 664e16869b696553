//! Parameters structure for AlignCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::{AlignCtrlError, Phase};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for alignment control.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {
    // ---- RUN DEFAULTS ----
    /// Step used when the start command does not provide one.
    ///
    /// Units: actuator units
    pub default_step: f64,

    /// Signal acquired threshold used when the start command does not provide one.
    ///
    /// Units: decibels
    pub default_min_threshold_db: f64,

    /// Received power above which the link is considered aligned.
    ///
    /// Units: decibels
    pub max_threshold_db: f64,

    /// Distance between the two units. Logged at the start of a run but not otherwise used.
    ///
    /// Units: meters
    pub distance: f64,

    // ---- SEARCH SHAPE ----
    /// Number of points per leg of the first spiral ring. Grows by 2 every ring.
    pub spiral_initial_points_per_line: u32,

    /// Number of points per line of the line scan. Doubles each time eight directions fail to
    /// reach alignment.
    pub line_initial_points_per_line: u32,

    /// Phase entered when the aligned unit sees its power drop below `max_threshold_db`.
    ///
    /// Must be `SpiralScan` or `LineScan`.
    pub resume_phase: Phase,

    // ---- MOTION MONITORING ----
    /// Number of ticks without reaching the wanted position after which the wanted position is
    /// reset to the current position.
    pub stall_limit_ticks: u32,

    /// Maximum per-axis difference between the current and wanted position for the actuator to
    /// be considered arrived. Zero demands exact equality.
    ///
    /// Units: actuator units
    pub arrival_tolerance: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            default_step: 100.0,
            default_min_threshold_db: 0.0,
            max_threshold_db: 25.0,
            distance: 10.0,
            spiral_initial_points_per_line: 2,
            line_initial_points_per_line: 5,
            resume_phase: Phase::SpiralScan,
            stall_limit_ticks: 200,
            arrival_tolerance: 0.0,
        }
    }
}

impl Params {
    /// Check that the parameters describe a usable search.
    pub fn validate(&self) -> Result<(), AlignCtrlError> {
        if !(self.default_step > 0.0) {
            return Err(AlignCtrlError::InvalidParam(format!(
                "default_step must be positive, found {}",
                self.default_step
            )));
        }

        if self.spiral_initial_points_per_line == 0 || self.line_initial_points_per_line == 0 {
            return Err(AlignCtrlError::InvalidParam(
                "initial points per line must be non-zero".into(),
            ));
        }

        if !matches!(self.resume_phase, Phase::SpiralScan | Phase::LineScan) {
            return Err(AlignCtrlError::InvalidParam(format!(
                "resume_phase must be SpiralScan or LineScan, found {}",
                self.resume_phase
            )));
        }

        if self.stall_limit_ticks == 0 {
            return Err(AlignCtrlError::InvalidParam(
                "stall_limit_ticks must be non-zero".into(),
            ));
        }

        if !(self.arrival_tolerance >= 0.0) {
            return Err(AlignCtrlError::InvalidParam(format!(
                "arrival_tolerance must not be negative, found {}",
                self.arrival_tolerance
            )));
        }

        if self.max_threshold_db < self.default_min_threshold_db {
            return Err(AlignCtrlError::InvalidParam(format!(
                "max_threshold_db ({}) is below default_min_threshold_db ({})",
                self.max_threshold_db, self.default_min_threshold_db
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_params_file() {
        let params: Params = util::params::from_str(
            r#"
            max_threshold_db = 20.0
            resume_phase = "LineScan"
            "#,
        )
        .unwrap();

        assert_eq!(params.max_threshold_db, 20.0);
        assert_eq!(params.resume_phase, Phase::LineScan);
        assert_eq!(params.default_step, 100.0);
        assert_eq!(params.stall_limit_ticks, 200);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(Params::default().validate().is_ok());

        let bad_resume = Params {
            resume_phase: Phase::Wait,
            ..Default::default()
        };
        assert!(bad_resume.validate().is_err());

        let bad_step = Params {
            default_step: 0.0,
            ..Default::default()
        };
        assert!(bad_step.validate().is_err());

        let bad_tol = Params {
            arrival_tolerance: -1.0,
            ..Default::default()
        };
        assert!(bad_tol.validate().is_err());
    }

    #[test]
    fn test_shipped_params_file() {
        let params: Params = util::params::load_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../params/align_ctrl.toml"
        ))
        .unwrap();

        assert!(params.validate().is_ok());
        assert_eq!(params.resume_phase, Phase::SpiralScan);
        assert_eq!(params.max_threshold_db, 25.0);
    }
}
