//! TOPIC command handler.

use async_trait::async_trait;
use tinyirc_proto::Message;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::{Context, PostRegHandler};
use crate::handlers::helpers::{channel_error, topic_replies};
use crate::state::actor::ChannelEvent;
use crate::state::RegisteredState;

/// Handler for TOPIC command.
///
/// `TOPIC #chan` queries, `TOPIC #chan :text` sets (an empty text clears).
pub struct TopicHandler;

#[async_trait]
impl PostRegHandler for TopicHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        let name = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
        let handle = ctx
            .matrix
            .channel_manager
            .get(name)
            .ok_or_else(|| HandlerError::NoSuchChannel(name.to_string()))?;

        let Some(text) = msg.arg(1) else {
            let info = handle
                .request(|reply_tx| ChannelEvent::GetInfo {
                    requester_uid: Some(ctx.uid.to_string()),
                    reply_tx,
                })
                .await
                .map_err(|e| channel_error(name, e))?;
            let replies = topic_replies(ctx.server_name(), ctx.nick(), name, info.topic.as_ref());
            ctx.outbox.extend(replies);
            return Ok(());
        };

        let sender_prefix = ctx
            .user_prefix()
            .ok_or_else(|| HandlerError::Internal(format!("registered uid {} missing", ctx.uid)))?;
        handle
            .request(|reply_tx| ChannelEvent::SetTopic {
                sender_uid: ctx.uid.to_string(),
                sender_prefix,
                text: text.to_string(),
                reply_tx,
            })
            .await
            .and_then(|r| r)
            .map_err(|e| channel_error(name, e))
    }
}
