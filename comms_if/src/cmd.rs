//! # Alignment command module
//!
//! This module provides the control commands accepted by the alignment application. Commands are
//! sent over the bus as JSON objects keyed on the `command` field, for example:
//!
//! ```json
//! {"command": "start", "step": 50, "min_threshold": 5}
//! {"command": "stop"}
//! ```

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use serde_json::{self, Value};
use structopt::StructOpt;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// STATICS
// ------------------------------------------------------------------------------------------------

/// Names of all commands which can be parsed into an [`AlignCmd`].
static KNOWN_COMMANDS: [&str; 2] = ["start", "stop"];

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be performed by the alignment application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, StructOpt)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum AlignCmd {
    /// Start a new alignment run. Only accepted while the controller is idle.
    #[structopt(name = "start")]
    Start {
        /// Actuator units moved per scan point. The configured default is used if not given.
        #[structopt(long)]
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,

        /// Received power (dB) above which a signal is considered acquired. The configured
        /// default is used if not given.
        #[structopt(long)]
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_threshold: Option<f64>,
    },

    /// Stop the current alignment run. Only accepted while the controller is running.
    #[structopt(name = "stop")]
    Stop,
}

/// Response sent back to the issuer of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmdResponse {
    /// The command was parsed and passed to the controller
    Ok,

    /// The command could not be parsed
    Invalid,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum CmdParseError {
    #[error("Command contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Command has no \"command\" string field")]
    MissingCommand,

    #[error("\"{0}\" is not a recognised command")]
    UnknownCommand(String),

    #[error("Command has invalid fields: {0}")]
    InvalidFields(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AlignCmd {
    /// Parse a command from a JSON string.
    ///
    /// Unrecognised fields are ignored. Unrecognised command names produce
    /// [`CmdParseError::UnknownCommand`], which callers are expected to ignore.
    pub fn from_json(json_str: &str) -> Result<Self, CmdParseError> {
        // Parse the JSON string into a value
        let val: Value = serde_json::from_str(json_str).map_err(CmdParseError::InvalidJson)?;

        // Check the command name is known before deserialising the fields
        let name = match val.get("command").and_then(Value::as_str) {
            Some(n) => n,
            None => return Err(CmdParseError::MissingCommand),
        };

        if !KNOWN_COMMANDS.contains(&name) {
            return Err(CmdParseError::UnknownCommand(name.to_string()));
        }

        serde_json::from_value(val).map_err(CmdParseError::InvalidFields)
    }

    /// Serialise the command into the JSON form accepted by [`AlignCmd::from_json`].
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_start() {
        assert_eq!(
            AlignCmd::from_json(r#"{"command": "start", "step": 50, "min_threshold": 5}"#)
                .unwrap(),
            AlignCmd::Start {
                step: Some(50.0),
                min_threshold: Some(5.0)
            }
        );

        // Missing optionals and unknown fields
        assert_eq!(
            AlignCmd::from_json(r#"{"command": "start", "colour": "red"}"#).unwrap(),
            AlignCmd::Start {
                step: None,
                min_threshold: None
            }
        );
    }

    #[test]
    fn test_parse_stop() {
        assert_eq!(
            AlignCmd::from_json(r#"{"command": "stop", "extra": 1}"#).unwrap(),
            AlignCmd::Stop
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            AlignCmd::from_json(r#"{"command": "dance"}"#),
            Err(CmdParseError::UnknownCommand(ref c)) if c == "dance"
        ));
        assert!(matches!(
            AlignCmd::from_json(r#"{"step": 10}"#),
            Err(CmdParseError::MissingCommand)
        ));
        assert!(matches!(
            AlignCmd::from_json("{not json"),
            Err(CmdParseError::InvalidJson(_))
        ));
        assert!(matches!(
            AlignCmd::from_json(r#"{"command": "start", "step": "big"}"#),
            Err(CmdParseError::InvalidFields(_))
        ));
    }

    #[test]
    fn test_json_loop() {
        let cmd = AlignCmd::Start {
            step: Some(20.0),
            min_threshold: None,
        };
        let json = cmd.to_json().unwrap();
        assert_eq!(json, r#"{"command":"start","step":20.0}"#);
        assert_eq!(AlignCmd::from_json(&json).unwrap(), cmd);
    }
}
