//! USER command handler.

use async_trait::async_trait;
use tinyirc_proto::Message;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::{Context, PostRegHandler, PreRegHandler};
use crate::state::{RegisteredState, UnregisteredState};

/// Handler for USER command.
pub struct UserHandler;

#[async_trait]
impl PreRegHandler for UserHandler {
    async fn handle(
        &self,
        ctx: &mut Context<'_, UnregisteredState>,
        msg: &Message,
    ) -> HandlerResult {
        // USER <username> <mode> <unused> :<realname>
        let (Some(username), Some(realname)) = (msg.arg(0), msg.arg(3)) else {
            return Err(HandlerError::NeedMoreParams);
        };
        if username.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }
        if ctx.state.user.is_some() {
            return Err(HandlerError::AlreadyRegistered);
        }

        ctx.state.user = Some(username.to_string());
        ctx.state.realname = Some(realname.to_string());
        Ok(())
    }
}

#[async_trait]
impl PostRegHandler for UserHandler {
    async fn handle(&self, _ctx: &mut Context<'_, RegisteredState>, _msg: &Message) -> HandlerResult {
        Err(HandlerError::AlreadyRegistered)
    }
}
