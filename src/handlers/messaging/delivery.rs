//! Target resolution and delivery shared by PRIVMSG and NOTICE.

use std::sync::Arc;

use tinyirc_proto::{is_channel_name, Message};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::Context;
use crate::handlers::helpers::{channel_error, split_list};
use crate::state::actor::ChannelEvent;
use crate::state::RegisteredState;

/// Deliver `msg` to each of its targets.
///
/// Errors that concern the whole command are returned. Per-target failures
/// are passed to `on_error` so the caller decides whether the client hears
/// about them.
pub(super) async fn route<F>(
    ctx: &mut Context<'_, RegisteredState>,
    msg: &Message,
    mut on_error: F,
) -> HandlerResult
where
    F: FnMut(&mut Context<'_, RegisteredState>, HandlerError) + Send,
{
    let verb = msg.verb.as_str();
    let targets = msg
        .arg(0)
        .filter(|t| !t.is_empty())
        .ok_or(HandlerError::NoRecipient)?;
    let text = msg
        .arg(1)
        .filter(|t| !t.is_empty())
        .ok_or(HandlerError::NoTextToSend)?;
    let prefix = ctx
        .user_prefix()
        .ok_or_else(|| HandlerError::Internal(format!("registered uid {} missing", ctx.uid)))?;

    for target in split_list(targets) {
        let out = Arc::new(Message::new(verb, [target, text]).with_prefix(prefix.clone()));
        let result = if is_channel_name(target) {
            to_channel(ctx, target, out).await
        } else {
            to_user(ctx, target, out)
        };
        if let Err(e) = result {
            on_error(&mut *ctx, e);
        }
    }
    Ok(())
}

async fn to_channel(
    ctx: &Context<'_, RegisteredState>,
    name: &str,
    out: Arc<Message>,
) -> HandlerResult {
    let handle = ctx
        .matrix
        .channel_manager
        .get(name)
        .ok_or_else(|| HandlerError::NoSuchChannel(name.to_string()))?;

    handle
        .request(|reply_tx| ChannelEvent::Message {
            sender_uid: ctx.uid.to_string(),
            message: out,
            reply_tx,
        })
        .await
        .and_then(|r| r)
        .map_err(|e| channel_error(name, e))
}

fn to_user(ctx: &Context<'_, RegisteredState>, nick: &str, out: Arc<Message>) -> HandlerResult {
    let uid = ctx
        .matrix
        .user_manager
        .resolve_nick(nick)
        .ok_or_else(|| HandlerError::NoSuchNick(nick.to_string()))?;
    if ctx.matrix.deliver(&uid, out) {
        Ok(())
    } else {
        Err(HandlerError::NoSuchNick(nick.to_string()))
    }
}
