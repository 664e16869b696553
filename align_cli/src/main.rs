//! # Alignment command line
//!
//! Interactive prompt which sends commands to a running alignment executive. Commands take the
//! same form as their JSON fields:
//!
//! ```text
//! start [--step <step>] [--min-threshold <min-threshold>]
//! stop
//! ```

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::iter;

use color_eyre::{eyre::WrapErr, Result};
use comms_if::{
    cmd::{AlignCmd, CmdResponse},
    net::{zmq, MonitoredSocket, SocketOptions},
};
use rustyline::{error::ReadlineError, DefaultEditor};
use structopt::StructOpt;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const PROMPT: &str = "align $ ";
const HISTORY_PATH: &str = "data/history.txt";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "align_cli", about = "Send commands to the alignment executive")]
struct Opts {
    /// Command endpoint of the executive
    #[structopt(short, long, default_value = "tcp://localhost:5020")]
    endpoint: String,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    let ctx = zmq::Context::new();

    let socket_options = SocketOptions {
        block_on_first_connect: false,
        connect_timeout: 1000,
        linger: 1,
        recv_timeout: 1000,
        send_timeout: 100,
        req_correlate: true,
        req_relaxed: true,
        ..Default::default()
    };

    let socket = MonitoredSocket::new(&ctx, zmq::REQ, socket_options, &opts.endpoint)
        .wrap_err("Could not create the command socket")?;

    let mut rl = DefaultEditor::new().wrap_err("Could not create the line editor")?;
    if rl.load_history(HISTORY_PATH).is_err() {
        println!("No history detected");
    }

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                println!("Unhandled Error: {:?}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rl.add_history_entry(line).ok();

        if line == "exit" || line == "quit" {
            break;
        }

        let cmd = match parse(line) {
            Ok(c) => c,
            Err(e) => {
                println!("{}", e.message);
                continue;
            }
        };

        if !socket.connected() {
            println!("Executive not connected, command may be delayed");
        }

        match send(&socket, &cmd) {
            Ok(CmdResponse::Ok) => println!("Ok"),
            Ok(CmdResponse::Invalid) => println!("Executive reported the command as invalid"),
            Err(e) => println!("{:#}", e),
        }
    }

    if let Err(e) = rl.save_history(HISTORY_PATH) {
        println!("Could not save history: {}", e);
    }

    println!("Exiting...");

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Parse a line into a command.
fn parse(line: &str) -> Result<AlignCmd, structopt::clap::Error> {
    AlignCmd::from_iter_safe(iter::once("align").chain(line.split_whitespace()))
}

/// Send a command and wait for the executive's response.
fn send(socket: &MonitoredSocket, cmd: &AlignCmd) -> Result<CmdResponse> {
    let msg = cmd.to_json().wrap_err("Could not serialise the command")?;

    socket.send(&msg, 0).wrap_err("Could not send the command")?;

    let response = socket
        .recv_string(0)
        .wrap_err("No response from the executive")?
        .map_err(|_| color_eyre::eyre::eyre!("Response was not valid UTF-8"))?;

    serde_json::from_str(&response).wrap_err("Could not parse the response")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            parse("start --step 50 --min-threshold 3").unwrap(),
            AlignCmd::Start {
                step: Some(50.0),
                min_threshold: Some(3.0)
            }
        );
        assert_eq!(
            parse("start").unwrap(),
            AlignCmd::Start {
                step: None,
                min_threshold: None
            }
        );
        assert_eq!(parse("stop").unwrap(), AlignCmd::Stop);
        assert!(parse("jump").is_err());
        assert!(parse("start --step fast").is_err());
    }
}
