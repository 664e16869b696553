//! # State snapshots
//!
//! The bus periodically delivers the last known state of the local unit and a mirror of the
//! remote (peer) unit. Any section may be missing if the corresponding driver or application has
//! not published yet, so all sections are optional.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{
    app::AppStatus,
    eqpt::{motor::MotorDriverState, sfp::SfpDriverState},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Last known state of the local unit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LocalState {
    #[serde(default)]
    pub sfp: Option<SfpDriverState>,

    #[serde(default)]
    pub motors: Option<MotorDriverState>,
}

/// Last known state of the remote unit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RemoteState {
    #[serde(default)]
    pub motors: Option<MotorDriverState>,

    #[serde(default)]
    pub app_status: Option<AppStatus>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_local_state() {
        let state: LocalState = serde_json::from_str(
            r#"{"motors": {"motor": {"current_x": 0, "current_y": 0, "next_x": 0, "next_y": 0}}}"#,
        )
        .unwrap();

        assert!(state.sfp.is_none());
        assert!(state.motors.is_some());

        let empty: LocalState = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, LocalState::default());
    }

    #[test]
    fn test_remote_state() {
        let state: RemoteState =
            serde_json::from_str(r#"{"app_status": {"case": 5}, "network": {}}"#).unwrap();

        assert_eq!(state.app_status, Some(AppStatus { case: 5 }));
        assert!(state.motors.is_none());
    }
}
