//! Registered-phase event loop.
//!
//! One `select!` multiplexes the four things a session waits on: input from
//! the client, lines queued for the client, a forced disconnect and the
//! keepalive deadline.

use std::sync::Arc;
use std::time::Instant;

use tinyirc_proto::{Message, TransportError};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::error_handling::{handler_error_reply, input_too_long, SessionEnd};
use super::handshake::RegisteredSession;
use super::Connection;
use crate::error::HandlerError;
use crate::handlers::core::Context;
use crate::state::RegisteredState;

/// Result of one pass through the select loop.
enum SelectResult {
    Line(Result<Option<String>, TransportError>),
    Outbound(Arc<Message>),
    Shutdown,
    Keepalive,
}

impl Connection {
    pub(super) async fn run_event_loop(&mut self, session: RegisteredSession) -> SessionEnd {
        let RegisteredSession {
            mut state,
            mut outbound,
            shutdown,
        } = session;
        let ping_interval = self.matrix.config.timeouts.ping_interval();
        let ping_timeout = self.matrix.config.timeouts.ping_timeout();

        loop {
            let deadline = if state.ping_pending {
                state.last_activity + ping_interval + ping_timeout
            } else {
                state.last_activity + ping_interval
            };

            let result = tokio::select! {
                biased;
                _ = shutdown.cancelled() => SelectResult::Shutdown,
                Some(msg) = outbound.recv() => SelectResult::Outbound(msg),
                read = self.transport.read_line() => SelectResult::Line(read),
                _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => {
                    SelectResult::Keepalive
                }
            };

            match result {
                SelectResult::Shutdown => return SessionEnd::Disconnected,
                SelectResult::Outbound(msg) => {
                    if let Err(e) = self.drain_outbound(msg, &mut outbound).await {
                        return SessionEnd::Transport(e);
                    }
                }
                SelectResult::Line(Ok(Some(line))) => {
                    state.touch();
                    match self.process_line(&mut state, &line).await {
                        Ok(Some(end)) => return end,
                        Ok(None) => {}
                        Err(e) => return SessionEnd::Transport(e),
                    }
                }
                SelectResult::Line(Ok(None)) => return SessionEnd::StreamClosed,
                SelectResult::Line(Err(e)) if !e.is_fatal() => {
                    state.touch();
                    let reply = input_too_long(&self.matrix.server_info.name, &state.nick);
                    if let Err(e) = self.transport.write_message(&reply).await {
                        return SessionEnd::Transport(e);
                    }
                }
                SelectResult::Line(Err(e)) => return SessionEnd::Transport(e),
                SelectResult::Keepalive => {
                    if state.ping_pending {
                        let waited = Instant::now().duration_since(state.last_activity);
                        return SessionEnd::PingTimeout(waited.as_secs());
                    }
                    state.ping_pending = true;
                    let ping = Message::new("PING", [self.matrix.server_info.name.as_str()]);
                    if let Err(e) = self.transport.write_message(&ping).await {
                        return SessionEnd::Transport(e);
                    }
                }
            }
        }
    }

    /// Write `first` plus whatever else is already queued, then flush once.
    async fn drain_outbound(
        &mut self,
        first: Arc<Message>,
        outbound: &mut mpsc::Receiver<Arc<Message>>,
    ) -> Result<(), TransportError> {
        self.transport.feed_message(&first).await?;
        while let Ok(msg) = outbound.try_recv() {
            self.transport.feed_message(&msg).await?;
        }
        self.transport.flush().await
    }

    /// Parse and dispatch one line. Returns the session end on QUIT.
    async fn process_line(
        &mut self,
        state: &mut RegisteredState,
        line: &str,
    ) -> Result<Option<SessionEnd>, TransportError> {
        trace!(uid = %self.uid, line = %line, "<- wire");
        let msg = match line.parse::<Message>() {
            Ok(msg) => msg,
            Err(e) => {
                debug!(uid = %self.uid, error = %e, "Ignoring unparsable line");
                return Ok(None);
            }
        };

        let mut outbox = Vec::new();
        let result = {
            let mut ctx = Context {
                uid: &self.uid,
                matrix: &self.matrix,
                outbox: &mut outbox,
                state: &mut *state,
                remote_addr: self.addr,
            };
            self.registry.dispatch_post_reg(&mut ctx, &msg).await
        };

        match result {
            Ok(()) => {}
            Err(HandlerError::Quit(reason)) => {
                self.write_all(&outbox).await?;
                return Ok(Some(SessionEnd::Quit(reason)));
            }
            Err(e) => {
                if let Some(reply) =
                    handler_error_reply(&self.matrix.server_info.name, &state.nick, &e, &msg.verb)
                {
                    outbox.push(reply);
                }
            }
        }
        self.write_all(&outbox).await?;
        Ok(None)
    }
}
