//! PART command handler.

use async_trait::async_trait;
use tinyirc_proto::Message;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::{Context, PostRegHandler};
use crate::handlers::helpers::{channel_error, split_list};
use crate::state::actor::ChannelEvent;
use crate::state::RegisteredState;

/// Handler for PART command.
pub struct PartHandler;

#[async_trait]
impl PostRegHandler for PartHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        // PART <channels> [:reason]
        let targets = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
        let reason = msg.arg(1).map(str::to_string);
        let prefix = ctx
            .user_prefix()
            .ok_or_else(|| HandlerError::Internal(format!("registered uid {} missing", ctx.uid)))?;

        for name in split_list(targets) {
            let Some(handle) = ctx.matrix.channel_manager.get(name) else {
                ctx.reply_error(HandlerError::NoSuchChannel(name.to_string()), "PART");
                continue;
            };

            let result = handle
                .request(|reply_tx| ChannelEvent::Part {
                    uid: ctx.uid.to_string(),
                    prefix: prefix.clone(),
                    reason: reason.clone(),
                    reply_tx,
                })
                .await
                .and_then(|r| r);

            match result {
                Ok(()) => {
                    if let Some(user) = ctx.matrix.user_manager.get(ctx.uid) {
                        user.write().channels.remove(name);
                    }
                }
                Err(e) => ctx.reply_error(channel_error(name, e), "PART"),
            }
        }
        Ok(())
    }
}
