//! Pre-registration phase.

use std::sync::Arc;

use tinyirc_proto::{Message, TransportError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::error_handling::{handler_error_reply, input_too_long};
use super::Connection;
use crate::error::HandlerError;
use crate::handlers::core::Context;
use crate::handlers::helpers::closing_link;
use crate::handlers::welcome_burst;
use crate::state::managers::user::SessionHandle;
use crate::state::{RegisteredState, SessionState, UnregisteredState, User};

/// Everything the event loop needs once the user is published.
pub(super) struct RegisteredSession {
    pub state: RegisteredState,
    pub outbound: mpsc::Receiver<Arc<Message>>,
    pub shutdown: CancellationToken,
}

impl Connection {
    /// Run the handshake. `Ok(None)` means the client left (or timed out)
    /// before registering.
    ///
    /// A nickname claimed during the handshake is released on every exit
    /// except successful registration.
    pub(super) async fn run_handshake(
        &mut self,
    ) -> Result<Option<RegisteredSession>, TransportError> {
        let mut state = UnregisteredState::default();
        let result = self.handshake_loop(&mut state).await;

        if !matches!(result, Ok(Some(_)))
            && let Some(nick) = state.nick.as_deref()
        {
            self.matrix.user_manager.release_nick(&self.uid, nick);
        }
        result
    }

    async fn handshake_loop(
        &mut self,
        state: &mut UnregisteredState,
    ) -> Result<Option<RegisteredSession>, TransportError> {
        let timeout = self.matrix.config.timeouts.registration_timeout();
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            let read = tokio::select! {
                _ = &mut deadline => {
                    debug!(uid = %self.uid, "Registration timed out");
                    let error = closing_link(&self.host(), "Registration timeout");
                    let _ = self.transport.write_message(&error).await;
                    return Ok(None);
                }
                read = self.transport.read_line() => read,
            };

            let line = match read {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(None),
                Err(e) if !e.is_fatal() => {
                    let reply = input_too_long(&self.matrix.server_info.name, state.nick_or_star());
                    self.transport.write_message(&reply).await?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let msg = match line.parse::<Message>() {
                Ok(msg) => msg,
                Err(e) => {
                    debug!(uid = %self.uid, error = %e, "Ignoring unparsable line");
                    continue;
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
                self.registry.dispatch_pre_reg(&mut ctx, &msg).await
            };

            match result {
                Ok(()) => {}
                Err(HandlerError::Quit(reason)) => {
                    let reason = format!("Quit: {}", reason.as_deref().unwrap_or("Client Quit"));
                    outbox.push(closing_link(&self.host(), &reason));
                    self.write_all(&outbox).await?;
                    return Ok(None);
                }
                Err(e) => {
                    let server_name = &self.matrix.server_info.name;
                    if let Some(reply) =
                        handler_error_reply(server_name, state.nick_or_star(), &e, &msg.verb)
                    {
                        outbox.push(reply);
                    }
                }
            }
            self.write_all(&outbox).await?;

            if state.can_register(self.matrix.config.simple_handshake) {
                match std::mem::take(state).try_register(self.matrix.config.simple_handshake) {
                    Ok(registered) => return self.publish(registered).await.map(Some),
                    Err(back) => *state = back,
                }
            }
        }
    }

    /// Insert the user into the registry and send the welcome burst.
    async fn publish(
        &mut self,
        state: RegisteredState,
    ) -> Result<RegisteredSession, TransportError> {
        let (sender, outbound) = mpsc::channel(self.matrix.config.limits.sendq);
        let shutdown = CancellationToken::new();

        let user = User::new(
            self.uid.clone(),
            state.nick.clone(),
            state.user.clone(),
            state.realname.clone(),
            self.host(),
        );
        self.matrix.user_manager.add_local_user(
            user,
            SessionHandle {
                sender,
                shutdown: shutdown.clone(),
            },
        );
        info!(
            uid = %self.uid,
            nick = %state.nick,
            addr = %self.addr,
            users = self.matrix.user_manager.user_count(),
            "Client registered"
        );

        let session = RegisteredSession {
            state,
            outbound,
            shutdown,
        };
        let burst = welcome_burst(
            &self.matrix.server_info,
            &session.state.nick,
            &session.state.user,
            &self.host(),
        );
        if let Err(e) = self.write_all(&burst).await {
            self.matrix
                .disconnect_user(&self.uid, "Connection closed")
                .await;
            return Err(e);
        }
        Ok(session)
    }
}
