//! Handler traits, one per registration phase.
//!
//! The phase is part of the handler's signature: a [`PostRegHandler`] only
//! ever receives a `Context<RegisteredState>`, so it cannot run on a
//! connection that has not finished the handshake.

use async_trait::async_trait;
use tinyirc_proto::Message;

use super::context::Context;
use crate::error::HandlerResult;
use crate::state::{RegisteredState, SessionState, UnregisteredState};

/// Commands valid before registration completes (NICK, USER).
#[async_trait]
pub trait PreRegHandler: Send + Sync {
    async fn handle(
        &self,
        ctx: &mut Context<'_, UnregisteredState>,
        msg: &Message,
    ) -> HandlerResult;
}

/// Commands requiring a registered connection.
#[async_trait]
pub trait PostRegHandler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message)
    -> HandlerResult;
}

/// Commands valid in any phase (QUIT, PING, PONG, server queries).
#[async_trait]
pub trait UniversalHandler: Send + Sync {
    async fn handle(
        &self,
        ctx: &mut Context<'_, dyn SessionState>,
        msg: &Message,
    ) -> HandlerResult;
}
