//! Client connection handling.
//!
//! A connection runs in two phases. The handshake reads commands with an
//! [`UnregisteredState`](crate::state::UnregisteredState) until NICK (and
//! USER, unless the simple handshake is on) have been accepted. The user is
//! then published to the registry and the event loop takes over with a
//! [`RegisteredState`](crate::state::RegisteredState). Whatever ends the
//! event loop, `disconnect_user` runs before the task exits.

mod error_handling;
mod event_loop;
mod handshake;

use std::net::SocketAddr;
use std::sync::Arc;

use tinyirc_proto::{Message, Transport, TransportError};
use tokio::net::TcpStream;
use tracing::debug;

use crate::handlers::helpers::closing_link;
use crate::handlers::Registry;
use crate::state::Matrix;

use error_handling::SessionEnd;

/// A single client connection.
pub struct Connection {
    uid: String,
    addr: SocketAddr,
    transport: Transport<TcpStream>,
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
}

impl Connection {
    pub fn new(
        uid: String,
        stream: TcpStream,
        addr: SocketAddr,
        matrix: Arc<Matrix>,
        registry: Arc<Registry>,
    ) -> Self {
        let transport = Transport::new(stream, matrix.config.limits.max_line_length);
        Self {
            uid,
            addr,
            transport,
            matrix,
            registry,
        }
    }

    /// Run the connection to completion.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let Some(session) = self.run_handshake().await? else {
            return Ok(());
        };

        let end = self.run_event_loop(session).await;
        debug!(uid = %self.uid, end = ?end, "Session ended");

        self.matrix
            .disconnect_user(&self.uid, &end.quit_message())
            .await;

        if let Some(reason) = end.error_reason() {
            let _ = self
                .transport
                .write_message(&closing_link(&self.host(), &reason))
                .await;
        }

        match end {
            SessionEnd::Transport(e) if !matches!(e, TransportError::Io(_)) => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Write `messages` in order with a single flush.
    async fn write_all(&mut self, messages: &[Message]) -> Result<(), TransportError> {
        if messages.is_empty() {
            return Ok(());
        }
        for message in messages {
            self.transport.feed_message(message).await?;
        }
        self.transport.flush().await
    }
}
