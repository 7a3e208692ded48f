//! MODE command handler.
//!
//! Dispatches to channel or user mode handling by the shape of the target.

mod channel;
mod user;

use async_trait::async_trait;
use tinyirc_proto::{is_channel_name, Message};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::{Context, PostRegHandler};
use crate::state::RegisteredState;

/// Handler for MODE command.
pub struct ModeHandler;

#[async_trait]
impl PostRegHandler for ModeHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        // MODE <target> [modestring [args...]]
        let target = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
        if is_channel_name(target) {
            channel::handle_channel_mode(ctx, target, msg).await
        } else {
            user::handle_user_mode(ctx, target, msg)
        }
    }
}
