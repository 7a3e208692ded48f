//! Channel mode queries and changes.

use tinyirc_proto::{parse_channel_modes, Message, ModeParseError, Response};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::Context;
use crate::handlers::helpers::channel_error;
use crate::state::actor::{ChannelEvent, ModeRequest};
use crate::state::RegisteredState;

pub(super) async fn handle_channel_mode(
    ctx: &mut Context<'_, RegisteredState>,
    name: &str,
    msg: &Message,
) -> HandlerResult {
    let handle = ctx
        .matrix
        .channel_manager
        .get(name)
        .ok_or_else(|| HandlerError::NoSuchChannel(name.to_string()))?;

    let Some(modestring) = msg.arg(1) else {
        let info = handle
            .request(|reply_tx| ChannelEvent::GetInfo {
                requester_uid: Some(ctx.uid.to_string()),
                reply_tx,
            })
            .await
            .map_err(|e| channel_error(name, e))?;
        let nick = ctx.state.nick.clone();
        ctx.send_reply(
            Response::RPL_CHANNELMODEIS,
            vec![nick, info.name, info.modes.as_mode_string()],
        );
        return Ok(());
    };

    let changes = parse_channel_modes(modestring, msg.args[2..].iter().map(String::as_str))
        .map_err(|e| match e {
            ModeParseError::UnknownMode(c) => HandlerError::UnknownMode(c),
            ModeParseError::MissingArgument(_) => HandlerError::NeedMoreParams,
        })?;
    if changes.is_empty() {
        return Ok(());
    }

    let requests = changes
        .into_iter()
        .map(|change| ModeRequest {
            target_uid: change
                .target()
                .and_then(|nick| ctx.matrix.user_manager.resolve_nick(nick)),
            change,
        })
        .collect();

    let sender_prefix = ctx
        .user_prefix()
        .ok_or_else(|| HandlerError::Internal(format!("registered uid {} missing", ctx.uid)))?;
    let outcome = handle
        .request(|reply_tx| ChannelEvent::ApplyModes {
            sender_uid: ctx.uid.to_string(),
            sender_prefix,
            requests,
            reply_tx,
        })
        .await
        .and_then(|r| r)
        .map_err(|e| channel_error(name, e))?;

    for rejected in outcome.rejected {
        ctx.reply_error(channel_error(name, rejected), "MODE");
    }
    Ok(())
}
