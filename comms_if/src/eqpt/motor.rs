//! # Motor driver interface
//!
//! The motor driver steers the two axis actuator of the unit. It publishes its state on the bus
//! and executes `motor_move` commands.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Name of the move command on the bus.
pub const MOTOR_MOVE_CMD: &str = "motor_move";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// State published by the motor driver.
///
/// Units: actuator units for all fields.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorState {
    /// Current position of the x axis
    pub current_x: f64,

    /// Current position of the y axis
    pub current_y: f64,

    /// Target the driver is moving the x axis towards
    pub next_x: f64,

    /// Target the driver is moving the y axis towards
    pub next_y: f64,
}

/// Wrapper for the motor driver's section of a state snapshot, `{"motor": {...}}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorDriverState {
    pub motor: MotorState,
}

/// Command requesting the motor driver to move to a new target.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MotorMove {
    pub next_x: f64,
    pub next_y: f64,
}

/// Envelope around a [`MotorMove`] as it is sent on the bus:
/// `{"command": "motor_move", "next_x": .., "next_y": ..}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MotorMoveMsg {
    pub command: MotorMoveTag,

    #[serde(flatten)]
    pub dems: MotorMove,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Unit tag which only (de)serialises as `"motor_move"`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorMoveTag {
    #[serde(rename = "motor_move")]
    MotorMove,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl From<MotorMove> for MotorMoveMsg {
    fn from(dems: MotorMove) -> Self {
        Self {
            command: MotorMoveTag::MotorMove,
            dems,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_motor_move_msg() {
        let msg = MotorMoveMsg::from(MotorMove {
            next_x: 50.0,
            next_y: -2.5,
        });

        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            format!(
                r#"{{"command":"{}","next_x":50.0,"next_y":-2.5}}"#,
                MOTOR_MOVE_CMD
            )
        );
    }

    #[test]
    fn test_motor_state_parse() {
        let state: MotorDriverState = serde_json::from_str(
            r#"{"motor": {"current_x": 1, "current_y": 2, "next_x": 3, "next_y": 4, "status_x": 0}}"#,
        )
        .unwrap();

        assert_eq!(state.motor.current_x, 1.0);
        assert_eq!(state.motor.next_y, 4.0);
    }
}
