//! Command handler context.
//!
//! `Context<'a, S>` is what every handler receives. `S` is the session phase:
//! [`UnregisteredState`](crate::state::UnregisteredState) for pre-registration
//! handlers, [`RegisteredState`](crate::state::RegisteredState) after the
//! handshake, or `dyn SessionState` for handlers valid in both.
//!
//! Replies to the client go into `outbox` and are written by the connection
//! after the handler returns. Traffic for other users goes through their
//! queues, never through the outbox.

use std::net::SocketAddr;
use std::sync::Arc;

use tinyirc_proto::{Message, Prefix, Response};

use crate::error::HandlerError;
use crate::handlers::helpers::server_reply;
use crate::state::{Matrix, SessionState};

pub struct Context<'a, S: ?Sized> {
    /// The user's unique ID.
    pub uid: &'a str,
    /// Shared server state.
    pub matrix: &'a Arc<Matrix>,
    /// Lines for this client, flushed in order after dispatch.
    pub outbox: &'a mut Vec<Message>,
    /// Session state (type varies by registration phase).
    pub state: &'a mut S,
    pub remote_addr: SocketAddr,
}

impl<'a, S: ?Sized> Context<'a, S> {
    pub fn server_name(&self) -> &str {
        &self.matrix.server_info.name
    }

    pub fn reply(&mut self, message: Message) {
        self.outbox.push(message);
    }

    /// Build and queue a numeric reply in one call.
    pub fn send_reply(&mut self, response: Response, params: Vec<String>) {
        let reply = server_reply(&self.matrix.server_info.name, response, params);
        self.outbox.push(reply);
    }

    /// `nick!user@host` for this connection, if the user is registered.
    pub fn user_prefix(&self) -> Option<Prefix> {
        self.matrix
            .user_manager
            .get(self.uid)
            .map(|user| user.read().prefix())
    }
}

impl<'a, S: SessionState + ?Sized> Context<'a, S> {
    /// Current nickname, or `*` before one is accepted.
    pub fn nick(&self) -> &str {
        self.state.nick_or_star()
    }

    /// Queue the numeric for `err`, if it has one, without aborting the
    /// command. Used for per-target failures in list arguments.
    pub fn reply_error(&mut self, err: HandlerError, cmd_name: &str) {
        if let Some(reply) = err.to_irc_reply(self.server_name(), self.nick(), cmd_name) {
            self.outbox.push(reply);
        }
    }
}

impl<'a, S: SessionState + 'static> Context<'a, S> {
    /// Reborrow as a phase-independent context for universal handlers.
    pub fn as_session(&mut self) -> Context<'_, dyn SessionState> {
        Context {
            uid: self.uid,
            matrix: self.matrix,
            outbox: &mut *self.outbox,
            state: &mut *self.state,
            remote_addr: self.remote_addr,
        }
    }
}
