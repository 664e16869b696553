//! # Command Client
//!
//! Receives control commands for the alignment controller. The executive binds a REP socket which
//! command issuers (such as `align_cli`) connect to with a REQ socket. Every received request is
//! answered with a [`CmdResponse`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    cmd::{AlignCmd, CmdParseError, CmdResponse},
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Command client
pub struct CmdClient {
    socket: MonitoredSocket,

    /// Response which could not be sent. The REP socket accepts no new request until it is.
    unsent_response: Option<CmdResponse>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CmdClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send the response: {0}")]
    SendError(zmq::Error),

    #[error("Could not recieve a message: {0}")]
    RecvError(zmq::Error),

    #[error("Could not serialize the data: {0}")]
    SerializationError(serde_json::Error),

    #[error("Could not parse the recieved command: {0}")]
    CmdParseError(CmdParseError),

    #[error("The issuer sent a message which was not valid UTF-8")]
    NonUtf8Request,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CmdClient {
    /// Create a new instance of the command client.
    ///
    /// This function will not block until an issuer connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, CmdClientError> {
        let socket_options = SocketOptions {
            bind: true,
            block_on_first_connect: false,
            linger: 1,
            recv_timeout: 0,
            send_timeout: 10,
            ..Default::default()
        };

        let socket = MonitoredSocket::new(ctx, zmq::REP, socket_options, &params.cmd_endpoint)
            .map_err(CmdClientError::SocketError)?;

        Ok(Self {
            socket,
            unsent_response: None,
        })
    }

    /// Recieve a single command.
    ///
    /// Call in a loop until `Ok(None)` is returned, at which point no more commands are pending.
    ///
    /// After recieving a valid command a response must be sent with `.send_response()` before
    /// attempting to recieve another. If the request can't be parsed the `Invalid` response is sent
    /// by this function.
    ///
    /// A response which previously failed to send is retried first. If it fails again no command
    /// is recieved.
    pub fn recieve_cmd(&mut self) -> Result<Option<AlignCmd>, CmdClientError> {
        let socket = &self.socket;
        retry_unsent(&mut self.unsent_response, |r| send_str(socket, r))?;

        let cmd_str = match self.socket.recv_string(0) {
            Ok(Ok(s)) => s,
            Ok(Err(_)) => {
                self.send_response(CmdResponse::Invalid)?;
                return Err(CmdClientError::NonUtf8Request);
            }
            // Nothing pending
            Err(zmq::Error::EAGAIN) => return Ok(None),
            Err(e) => return Err(CmdClientError::RecvError(e)),
        };

        match AlignCmd::from_json(&cmd_str) {
            Ok(cmd) => Ok(Some(cmd)),
            Err(e) => {
                self.send_response(CmdResponse::Invalid)?;
                Err(CmdClientError::CmdParseError(e))
            }
        }
    }

    /// Send the given response back to the issuer.
    ///
    /// On failure the response is kept and retried by the next call to `.recieve_cmd()`.
    pub fn send_response(&mut self, response: CmdResponse) -> Result<(), CmdClientError> {
        let socket = &self.socket;
        self.unsent_response = Some(response);
        retry_unsent(&mut self.unsent_response, |r| send_str(socket, r))
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn send_str(socket: &MonitoredSocket, response: CmdResponse) -> Result<(), CmdClientError> {
    let response_str =
        serde_json::to_string(&response).map_err(CmdClientError::SerializationError)?;

    socket
        .send(&response_str, 0)
        .map_err(CmdClientError::SendError)
}

/// Send the response held in `unsent`, if any, clearing it once sent.
fn retry_unsent<F, E>(unsent: &mut Option<CmdResponse>, send: F) -> Result<(), E>
where
    F: FnOnce(CmdResponse) -> Result<(), E>,
{
    if let Some(response) = *unsent {
        send(response)?;
        *unsent = None;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unsent_response_retried() {
        let mut unsent = Some(CmdResponse::Ok);

        // Still failing, the response is kept
        assert_eq!(
            retry_unsent(&mut unsent, |_| Err(zmq::Error::EAGAIN)),
            Err(zmq::Error::EAGAIN)
        );
        assert_eq!(unsent, Some(CmdResponse::Ok));

        let mut sent = None;
        assert_eq!(
            retry_unsent(&mut unsent, |r| {
                sent = Some(r);
                Ok::<(), zmq::Error>(())
            }),
            Ok(())
        );
        assert_eq!(sent, Some(CmdResponse::Ok));
        assert!(unsent.is_none());

        // Nothing left to retry
        assert_eq!(
            retry_unsent(&mut unsent, |_| -> Result<(), zmq::Error> {
                panic!("nothing should be sent")
            }),
            Ok(())
        );
    }
}
