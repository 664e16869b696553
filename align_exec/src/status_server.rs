//! # Status Server
//!
//! Publishes the application status of this unit, which the peer unit uses for the rendezvous,
//! together with the controller's status report.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

use comms_if::{
    app::AppStatus,
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

use crate::{align_ctrl, data_store::DataStore};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Status server
pub struct StatusServer {
    socket: MonitoredSocket,
}

/// Packet published by the server.
#[derive(Debug, Serialize)]
pub struct StatusPacket {
    pub elapsed_s: f64,

    pub app_status: Option<AppStatus>,

    pub align_ctrl_status_rpt: Option<align_ctrl::StatusReport>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StatusServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send the status: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the status: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl StatusServer {
    /// Create a new instance of the status server.
    ///
    /// This function will not block until a subscriber connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, StatusServerError> {
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            bind: true,
            linger: 1,
            send_timeout: 10,
            ..Default::default()
        };

        let socket = MonitoredSocket::new(ctx, zmq::PUB, socket_options, &params.status_endpoint)
            .map_err(StatusServerError::SocketError)?;

        Ok(Self { socket })
    }

    /// Publish the status for this cycle.
    ///
    /// Nothing is sent if the controller produced no status.
    pub fn send(&mut self, ds: &DataStore) -> Result<(), StatusServerError> {
        let packet = match StatusPacket::from_datastore(ds) {
            Some(p) => p,
            None => return Ok(()),
        };

        let packet_string =
            serde_json::to_string(&packet).map_err(StatusServerError::SerializationError)?;

        self.socket
            .send(&packet_string, 0)
            .map_err(StatusServerError::SendError)
    }
}

impl StatusPacket {
    pub fn from_datastore(ds: &DataStore) -> Option<Self> {
        ds.align_ctrl_output.status.map(|status| Self {
            elapsed_s: ds.elapsed_s,
            app_status: Some(status),
            align_ctrl_status_rpt: ds.align_ctrl_status_rpt,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_packet_only_with_status() {
        let mut ds = DataStore::default();
        assert!(StatusPacket::from_datastore(&ds).is_none());

        ds.align_ctrl_output.status = Some(AppStatus { case: 1 });
        let packet = StatusPacket::from_datastore(&ds).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&packet).unwrap()).unwrap();
        assert_eq!(json["app_status"]["case"], 1);
    }
}
