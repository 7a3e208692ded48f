//! JOIN command handler.

use std::sync::Arc;

use async_trait::async_trait;
use tinyirc_proto::{is_channel_name, normalize_channel_name, Message};
use tracing::{debug, info};

use crate::error::{ChannelError, HandlerError, HandlerResult};
use crate::handlers::core::{Context, PostRegHandler};
use crate::handlers::helpers::{channel_error, split_list};
use crate::state::actor::{ChannelEvent, JoinOutcome, JoinParams};
use crate::state::RegisteredState;

/// A channel can be pruned between lookup and join; retry against the
/// fresh one this many times.
const JOIN_ATTEMPTS: usize = 3;

/// Handler for JOIN command.
///
/// `JOIN #a,b,&c` joins each channel in turn; a bare name gets `#`.
pub struct JoinHandler;

#[async_trait]
impl PostRegHandler for JoinHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        let targets = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;

        for raw in split_list(targets) {
            let name = normalize_channel_name(raw);
            if !is_channel_name(&name) {
                ctx.reply_error(HandlerError::NoSuchChannel(name), "JOIN");
                continue;
            }
            if let Err(e) = join_channel(ctx, &name).await {
                ctx.reply_error(e, "JOIN");
            }
        }
        Ok(())
    }
}

async fn join_channel(ctx: &mut Context<'_, RegisteredState>, name: &str) -> HandlerResult {
    let user = ctx
        .matrix
        .user_manager
        .get(ctx.uid)
        .ok_or_else(|| HandlerError::Internal(format!("registered uid {} missing", ctx.uid)))?;
    let session = ctx
        .matrix
        .user_manager
        .session(ctx.uid)
        .ok_or_else(|| HandlerError::Internal(format!("no session for {}", ctx.uid)))?;

    // The channel actor records membership in the user's channel set.
    let prefix = user.read().prefix();

    for _ in 0..JOIN_ATTEMPTS {
        let (handle, created) = ctx
            .matrix
            .channel_manager
            .get_or_create(name, Arc::downgrade(ctx.matrix));

        let result = handle
            .request(|reply_tx| ChannelEvent::Join {
                params: JoinParams {
                    uid: ctx.uid.to_string(),
                    nick: ctx.state.nick.clone(),
                    prefix: prefix.clone(),
                    sender: session.sender.clone(),
                },
                reply_tx,
            })
            .await
            .and_then(|outcome| outcome);

        match result {
            Ok(JoinOutcome::Joined { op }) => {
                if created {
                    info!(channel = %name, creator = %ctx.state.nick, "Channel created");
                }
                debug!(channel = %name, uid = %ctx.uid, op, "Joined channel");
                return Ok(());
            }
            Ok(JoinOutcome::AlreadyMember) => return Ok(()),
            Err(ChannelError::ChannelTombstone) => continue,
            Err(e) => return Err(channel_error(name, e)),
        }
    }

    Err(HandlerError::Internal(format!(
        "channel {name} closed {JOIN_ATTEMPTS} times during join"
    )))
}
