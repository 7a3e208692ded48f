//! KICK command handler.

use async_trait::async_trait;
use tinyirc_proto::Message;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::{Context, PostRegHandler};
use crate::handlers::helpers::{channel_error, split_list};
use crate::state::actor::ChannelEvent;
use crate::state::RegisteredState;

/// Handler for KICK command.
///
/// `KICK #chan nick[,nick...] [:reason]`. The reason defaults to the
/// kicker's nickname.
pub struct KickHandler;

#[async_trait]
impl PostRegHandler for KickHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        let (Some(name), Some(targets)) = (msg.arg(0), msg.arg(1)) else {
            return Err(HandlerError::NeedMoreParams);
        };
        let handle = ctx
            .matrix
            .channel_manager
            .get(name)
            .ok_or_else(|| HandlerError::NoSuchChannel(name.to_string()))?;
        let reason = msg
            .arg(2)
            .filter(|r| !r.is_empty())
            .unwrap_or(ctx.state.nick.as_str())
            .to_string();
        let sender_prefix = ctx
            .user_prefix()
            .ok_or_else(|| HandlerError::Internal(format!("registered uid {} missing", ctx.uid)))?;

        for target_nick in split_list(targets) {
            let Some(target_uid) = ctx.matrix.user_manager.resolve_nick(target_nick) else {
                ctx.reply_error(HandlerError::NoSuchNick(target_nick.to_string()), "KICK");
                continue;
            };

            let result = handle
                .request(|reply_tx| ChannelEvent::Kick {
                    sender_uid: ctx.uid.to_string(),
                    sender_prefix: sender_prefix.clone(),
                    target_uid,
                    target_nick: target_nick.to_string(),
                    reason: reason.clone(),
                    reply_tx,
                })
                .await
                .and_then(|r| r);

            if let Err(e) = result {
                ctx.reply_error(channel_error(name, e), "KICK");
            }
        }
        Ok(())
    }
}
