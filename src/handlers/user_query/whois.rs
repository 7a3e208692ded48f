//! WHOIS command handler.

use async_trait::async_trait;
use tinyirc_proto::{Message, Response};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::{Context, PostRegHandler};
use crate::state::actor::ChannelEvent;
use crate::state::RegisteredState;

/// Handler for WHOIS command.
///
/// `WHOIS [server] nick`: the last argument is the nickname. Replies 311,
/// 312, 319 (when the user is on visible channels) and 318.
pub struct WhoisHandler;

#[async_trait]
impl PostRegHandler for WhoisHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        let target = msg
            .args
            .last()
            .filter(|n| !n.is_empty())
            .ok_or(HandlerError::NoNicknameGiven)?;
        let me = ctx.state.nick.clone();

        let Some(user) = ctx.matrix.user_manager.lookup(target) else {
            ctx.reply_error(HandlerError::NoSuchNick(target.clone()), "WHOIS");
            end_of_whois(ctx, &me, target);
            return Ok(());
        };

        let (uid, nick, username, host, realname, invisible, mut channels) = {
            let user = user.read();
            (
                user.uid.clone(),
                user.nick.clone(),
                user.user.clone(),
                user.host.clone(),
                user.realname.clone(),
                user.modes.invisible,
                user.channels.iter().cloned().collect::<Vec<_>>(),
            )
        };
        channels.sort();

        ctx.send_reply(
            Response::RPL_WHOISUSER,
            vec![me.clone(), nick.clone(), username, host, "*".to_string(), realname],
        );
        let server = &ctx.matrix.server_info;
        let (server_name, description) = (server.name.clone(), server.description.clone());
        ctx.send_reply(
            Response::RPL_WHOISSERVER,
            vec![me.clone(), nick.clone(), server_name, description],
        );

        // An invisible user's channels are only shown to people sharing them.
        let shared: Vec<String> = if invisible && uid != ctx.uid {
            let mine = ctx
                .matrix
                .user_manager
                .get(ctx.uid)
                .map(|u| u.read().channels.clone())
                .unwrap_or_default();
            channels.into_iter().filter(|c| mine.contains(c)).collect()
        } else {
            channels
        };

        let mut entries = Vec::with_capacity(shared.len());
        for name in shared {
            let Some(handle) = ctx.matrix.channel_manager.get(&name) else {
                continue;
            };
            let Ok(members) = handle
                .request(|reply_tx| ChannelEvent::GetMembers { reply_tx })
                .await
            else {
                continue;
            };
            if let Some(member) = members.iter().find(|m| m.uid == uid) {
                entries.push(format!("{}{}", member.prefix(), name));
            }
        }
        if !entries.is_empty() {
            ctx.send_reply(
                Response::RPL_WHOISCHANNELS,
                vec![me.clone(), nick.clone(), entries.join(" ")],
            );
        }

        end_of_whois(ctx, &me, &nick);
        Ok(())
    }
}

fn end_of_whois(ctx: &mut Context<'_, RegisteredState>, me: &str, nick: &str) {
    ctx.send_reply(
        Response::RPL_ENDOFWHOIS,
        vec![
            me.to_string(),
            nick.to_string(),
            "End of /WHOIS list".to_string(),
        ],
    );
}
