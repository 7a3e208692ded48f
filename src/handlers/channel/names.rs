//! NAMES command handler.

use async_trait::async_trait;
use tinyirc_proto::Message;

use crate::error::HandlerResult;
use crate::handlers::core::{Context, PostRegHandler};
use crate::handlers::helpers::{end_of_names, names_replies, namreply_lines, split_list};
use crate::state::actor::ChannelEvent;
use crate::state::managers::channel::ChannelHandle;
use crate::state::RegisteredState;

/// Handler for NAMES command.
///
/// Members with `+i` are left out unless the requester shares the channel.
/// Without arguments every channel is listed under a single `366 *`.
pub struct NamesHandler;

#[async_trait]
impl PostRegHandler for NamesHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        match msg.arg(0) {
            Some(targets) => {
                for name in split_list(targets) {
                    let names = match ctx.matrix.channel_manager.get(name) {
                        Some(handle) => visible_names(ctx, &handle).await,
                        None => Vec::new(),
                    };
                    let replies = names_replies(ctx.server_name(), ctx.nick(), name, &names);
                    ctx.outbox.extend(replies);
                }
            }
            None => {
                for handle in ctx.matrix.channel_manager.handles() {
                    let names = visible_names(ctx, &handle).await;
                    if names.is_empty() {
                        continue;
                    }
                    let replies = namreply_lines(ctx.server_name(), ctx.nick(), &handle.name, &names);
                    ctx.outbox.extend(replies);
                }
                let end = end_of_names(ctx.server_name(), ctx.nick(), "*");
                ctx.reply(end);
            }
        }
        Ok(())
    }
}

/// `@nick`/`+nick`/`nick` entries the requester is allowed to see.
async fn visible_names(ctx: &Context<'_, RegisteredState>, handle: &ChannelHandle) -> Vec<String> {
    let Ok(members) = handle
        .request(|reply_tx| ChannelEvent::GetMembers { reply_tx })
        .await
    else {
        return Vec::new();
    };

    let requester_is_member = members.iter().any(|m| m.uid == ctx.uid);
    members
        .into_iter()
        .filter(|m| requester_is_member || !is_invisible(ctx, &m.uid))
        .map(|m| format!("{}{}", m.prefix(), m.nick))
        .collect()
}

fn is_invisible(ctx: &Context<'_, RegisteredState>, uid: &str) -> bool {
    ctx.matrix
        .user_manager
        .get(uid)
        .is_some_and(|user| user.read().modes.invisible)
}
