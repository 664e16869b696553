//! # Motor Client
//!
//! Sends move commands to the local motor driver.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    eqpt::motor::{MotorMove, MotorMoveMsg},
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Motor client
pub struct MotorClient {
    socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MotorClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("The client is not connected to the motor driver")]
    NotConnected,

    #[error("Could not send the move command: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the move command: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MotorClient {
    /// Create a new instance of the motor client.
    ///
    /// This function will not block until the driver connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, MotorClientError> {
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            connect_timeout: 1000,
            heartbeat_ivl: 500,
            heartbeat_ttl: 1000,
            heartbeat_timeout: 1000,
            linger: 1,
            send_timeout: 10,
            ..Default::default()
        };

        let socket = MonitoredSocket::new(
            ctx,
            zmq::PUSH,
            socket_options,
            &params.motor_cmd_endpoint,
        )
        .map_err(MotorClientError::SocketError)?;

        Ok(Self { socket })
    }

    /// Check if the client is connected to the driver
    pub fn is_connected(&self) -> bool {
        self.socket.connected()
    }

    /// Send a move command to the driver.
    pub fn send_move(&self, dems: MotorMove) -> Result<(), MotorClientError> {
        if !self.socket.connected() {
            return Err(MotorClientError::NotConnected);
        }

        let msg = serde_json::to_string(&MotorMoveMsg::from(dems))
            .map_err(MotorClientError::SerializationError)?;

        self.socket.send(&msg, 0).map_err(MotorClientError::SendError)
    }
}
