//! NICK command handler, before and after registration.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tinyirc_proto::{is_valid_nick, Message};
use tracing::{debug, info};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::{Context, PostRegHandler, PreRegHandler};
use crate::state::actor::ChannelEvent;
use crate::state::{Matrix, RegisteredState, UnregisteredState};

/// Handler for NICK command.
pub struct NickHandler;

/// The requested nickname, checked against the configured length limit.
fn requested_nick<'m>(matrix: &Matrix, msg: &'m Message) -> Result<&'m str, HandlerError> {
    let nick = msg
        .arg(0)
        .filter(|n| !n.is_empty())
        .ok_or(HandlerError::NoNicknameGiven)?;
    if !is_valid_nick(nick, matrix.config.limits.max_nick_length) {
        return Err(HandlerError::ErroneousNickname(nick.to_string()));
    }
    Ok(nick)
}

#[async_trait]
impl PreRegHandler for NickHandler {
    async fn handle(
        &self,
        ctx: &mut Context<'_, UnregisteredState>,
        msg: &Message,
    ) -> HandlerResult {
        // NICK <nickname>
        let nick = requested_nick(ctx.matrix, msg)?;
        if ctx.state.nick.as_deref() == Some(nick) {
            return Ok(());
        }

        // Claim the new nick before letting go of the old one.
        ctx.matrix.user_manager.claim_nick(ctx.uid, nick)?;
        if let Some(old) = ctx.state.nick.replace(nick.to_string()) {
            ctx.matrix.user_manager.release_nick(ctx.uid, &old);
        }

        debug!(nick = %nick, uid = %ctx.uid, "Nick set");
        Ok(())
    }
}

#[async_trait]
impl PostRegHandler for NickHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        let nick = requested_nick(ctx.matrix, msg)?;
        if nick == ctx.state.nick {
            return Ok(());
        }

        let user = ctx
            .matrix
            .user_manager
            .get(ctx.uid)
            .ok_or_else(|| HandlerError::Internal(format!("registered uid {} missing", ctx.uid)))?;
        let old_prefix = user.read().prefix();

        let old_nick = ctx.matrix.user_manager.rename(ctx.uid, nick)?;
        ctx.state.nick = nick.to_string();

        let nick_msg = Arc::new(Message::new("NICK", [nick]).with_prefix(old_prefix));
        ctx.reply((*nick_msg).clone());

        let channels: Vec<String> = user.read().channels.iter().cloned().collect();
        let notified = Arc::new(Mutex::new(HashSet::from([ctx.uid.to_string()])));
        for name in channels {
            if let Some(handle) = ctx.matrix.channel_manager.get(&name) {
                let _ = handle
                    .send(ChannelEvent::NickChange {
                        uid: ctx.uid.to_string(),
                        new_nick: nick.to_string(),
                        message: Arc::clone(&nick_msg),
                        notified: Arc::clone(&notified),
                    })
                    .await;
            }
        }

        info!(uid = %ctx.uid, old = %old_nick, new = %nick, "Nick changed");
        Ok(())
    }
}
