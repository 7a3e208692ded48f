//! How a session ends, and what the client and the channels are told.

use tinyirc_proto::{Message, Response, TransportError};

use crate::error::HandlerError;
use crate::handlers::helpers::server_reply;

/// Why the registered event loop stopped.
#[derive(Debug)]
pub(super) enum SessionEnd {
    /// Client sent QUIT.
    Quit(Option<String>),
    /// Peer closed the stream.
    StreamClosed,
    /// Read or write failed.
    Transport(TransportError),
    /// No answer to a keepalive PING.
    PingTimeout(u64),
    /// Removed by the server (SendQ overflow, shutdown).
    Disconnected,
}

impl SessionEnd {
    /// QUIT text sent to the user's channels.
    pub(super) fn quit_message(&self) -> String {
        match self {
            Self::Quit(Some(reason)) => format!("Quit: {reason}"),
            Self::Quit(None) => "Quit: Client Quit".to_string(),
            Self::StreamClosed | Self::Disconnected => "Connection closed".to_string(),
            Self::Transport(TransportError::IllegalControlChar(_)) => {
                "Illegal control character".to_string()
            }
            Self::Transport(_) => "Connection closed".to_string(),
            Self::PingTimeout(secs) => format!("Ping timeout: {secs} seconds"),
        }
    }

    /// Reason for the final `ERROR` line, when the client can still read it.
    pub(super) fn error_reason(&self) -> Option<String> {
        match self {
            Self::Quit(_) | Self::PingTimeout(_) => Some(self.quit_message()),
            Self::Transport(TransportError::IllegalControlChar(_)) => Some(self.quit_message()),
            Self::Disconnected => Some("Disconnected".to_string()),
            Self::StreamClosed | Self::Transport(_) => None,
        }
    }
}

/// ERR_INPUTTOOLONG for a line over the limit; the session carries on.
pub(super) fn input_too_long(server_name: &str, nick: &str) -> Message {
    server_reply(
        server_name,
        Response::ERR_INPUTTOOLONG,
        vec![nick.to_string(), "Input line was too long".to_string()],
    )
}

/// Numeric reply for a failed command, if the error has one.
pub(super) fn handler_error_reply(
    server_name: &str,
    nick: &str,
    error: &HandlerError,
    verb: &str,
) -> Option<Message> {
    error.to_irc_reply(server_name, nick, verb)
}
