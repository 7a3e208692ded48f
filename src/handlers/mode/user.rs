//! User mode queries and changes. Only `+i` exists, and only for yourself.

use tinyirc_proto::{parse_user_modes, Message, Response, UserModeChange};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::Context;
use crate::state::RegisteredState;

pub(super) fn handle_user_mode(
    ctx: &mut Context<'_, RegisteredState>,
    target: &str,
    msg: &Message,
) -> HandlerResult {
    if target != ctx.state.nick {
        return Err(if ctx.matrix.user_manager.lookup(target).is_some() {
            HandlerError::UsersDontMatch
        } else {
            HandlerError::NoSuchNick(target.to_string())
        });
    }

    let user = ctx
        .matrix
        .user_manager
        .get(ctx.uid)
        .ok_or_else(|| HandlerError::Internal(format!("registered uid {} missing", ctx.uid)))?;

    let Some(modestring) = msg.arg(1) else {
        let modes = user.read().modes.as_mode_string();
        let nick = ctx.state.nick.clone();
        ctx.send_reply(Response::RPL_UMODEIS, vec![nick, modes]);
        return Ok(());
    };

    let changes = parse_user_modes(modestring).map_err(|_| HandlerError::UnknownUserMode)?;
    let applied: Vec<UserModeChange> = {
        let mut user = user.write();
        changes
            .into_iter()
            .filter(|change| match *change {
                UserModeChange::Invisible(on) => {
                    let changed = user.modes.invisible != on;
                    user.modes.invisible = on;
                    changed
                }
            })
            .collect()
    };

    if !applied.is_empty() {
        let modes: String = applied.iter().map(ToString::to_string).collect();
        let prefix = user.read().prefix();
        let nick = ctx.state.nick.clone();
        ctx.reply(Message::new("MODE", [nick, modes]).with_prefix(prefix));
    }
    Ok(())
}
