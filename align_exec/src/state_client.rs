//! # State Client
//!
//! Subscribes to the state snapshots published on the bus. One client is used for the local
//! unit's state and one for the mirrored state of the remote unit. Only the most recent snapshot
//! is of interest, so the subscription is conflated.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::marker::PhantomData;

use comms_if::net::{zmq, MonitoredSocket, MonitoredSocketError, SocketOptions};
use serde::de::DeserializeOwned;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Client receiving snapshots of type `S`.
pub struct StateClient<S> {
    socket: MonitoredSocket,

    _state: PhantomData<S>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StateClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not recieve a message from the publisher: {0}")]
    RecvError(zmq::Error),

    #[error("Could not deserialize the state: {0}")]
    DeserializeError(serde_json::Error),

    #[error("The publisher sent a message which was not valid UTF-8")]
    NonUtf8Message,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S> StateClient<S>
where
    S: DeserializeOwned,
{
    /// Create a new state client subscribed to the given endpoint.
    ///
    /// This function will not block until the publisher connects.
    pub fn new(ctx: &zmq::Context, endpoint: &str) -> Result<Self, StateClientError> {
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            conflate: true,
            connect_timeout: 1000,
            linger: 1,
            recv_timeout: 0,
            ..Default::default()
        };

        let socket = MonitoredSocket::new(ctx, zmq::SUB, socket_options, endpoint)
            .map_err(StateClientError::SocketError)?;

        Ok(Self {
            socket,
            _state: PhantomData,
        })
    }

    /// Check if the client is connected to the publisher
    pub fn is_connected(&self) -> bool {
        self.socket.connected()
    }

    /// Get the latest snapshot, or `None` if nothing has been published since the last call.
    pub fn recieve_latest(&self) -> Result<Option<S>, StateClientError> {
        let mut latest = None;

        loop {
            let msg = match self.socket.recv_string(0) {
                Ok(Ok(s)) => s,
                Ok(Err(_)) => return Err(StateClientError::NonUtf8Message),
                Err(zmq::Error::EAGAIN) => break,
                Err(e) => return Err(StateClientError::RecvError(e)),
            };

            latest = Some(parse_state(&msg)?);
        }

        Ok(latest)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Parse a state snapshot from its JSON form.
pub fn parse_state<S: DeserializeOwned>(msg: &str) -> Result<S, StateClientError> {
    serde_json::from_str(msg).map_err(StateClientError::DeserializeError)
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::state::{LocalState, RemoteState};

    #[test]
    fn test_parse_state() {
        let local: LocalState = parse_state(
            r#"{
                "sfp": {"sfp": {"1": {"rx_power_db": -3.5}, "0": {"rx_power_db": 2.0}}},
                "motors": {"motor": {"current_x": 10, "current_y": -20, "next_x": 10, "next_y": 0}}
            }"#,
        )
        .unwrap();

        assert_eq!(local.sfp.unwrap().first().unwrap().rx_power_db, 2.0);
        assert_eq!(local.motors.unwrap().motor.current_y, -20.0);

        let remote: RemoteState = parse_state(r#"{"app_status": {"case": 5}}"#).unwrap();
        assert!(remote.motors.is_none());
        assert_eq!(remote.app_status.unwrap().case, 5);

        assert!(matches!(
            parse_state::<RemoteState>("not json"),
            Err(StateClientError::DeserializeError(_))
        ));
    }
}
