//! LIST command handler.

use async_trait::async_trait;
use tinyirc_proto::{Message, Response};

use crate::error::HandlerResult;
use crate::handlers::core::{Context, PostRegHandler};
use crate::handlers::helpers::split_list;
use crate::state::actor::ChannelEvent;
use crate::state::RegisteredState;

/// Handler for LIST command.
pub struct ListHandler;

#[async_trait]
impl PostRegHandler for ListHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        // LIST [channels]
        let nick = ctx.state.nick.clone();
        ctx.send_reply(
            Response::RPL_LISTSTART,
            vec![nick.clone(), "Channel".to_string(), "Users  Name".to_string()],
        );

        let handles: Vec<_> = match msg.arg(0) {
            Some(targets) => split_list(targets)
                .filter_map(|name| ctx.matrix.channel_manager.get(name))
                .collect(),
            None => ctx.matrix.channel_manager.handles(),
        };

        let limit = ctx.matrix.config.limits.max_list_channels;
        for handle in handles.into_iter().take(limit) {
            let Ok(info) = handle
                .request(|reply_tx| ChannelEvent::GetInfo {
                    requester_uid: Some(ctx.uid.to_string()),
                    reply_tx,
                })
                .await
            else {
                continue;
            };
            let topic = info.topic.map(|t| t.text).unwrap_or_default();
            ctx.send_reply(
                Response::RPL_LIST,
                vec![nick.clone(), info.name, info.member_count.to_string(), topic],
            );
        }

        ctx.send_reply(
            Response::RPL_LISTEND,
            vec![nick, "End of /LIST".to_string()],
        );
        Ok(())
    }
}
