//! PRIVMSG command handler.

use async_trait::async_trait;
use tinyirc_proto::Message;

use super::delivery::route;
use crate::error::HandlerResult;
use crate::handlers::core::{Context, PostRegHandler};
use crate::state::RegisteredState;

/// Handler for PRIVMSG command.
pub struct PrivmsgHandler;

#[async_trait]
impl PostRegHandler for PrivmsgHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        route(ctx, msg, |ctx, e| ctx.reply_error(e, "PRIVMSG")).await
    }
}
