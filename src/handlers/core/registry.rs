//! Command handler registry and dispatch.
//!
//! Built once at start-up and shared by every connection. Dispatch picks the
//! handler table by the connection's phase; the lookup order is universal
//! handlers first, then the phase's own table.

use std::collections::HashMap;

use tinyirc_proto::Message;
use tracing::{debug, debug_span, Instrument};

use super::context::Context;
use super::traits::{PostRegHandler, PreRegHandler, UniversalHandler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    channel::{JoinHandler, KickHandler, ListHandler, NamesHandler, PartHandler, TopicHandler},
    connection::{NickHandler, PingHandler, PongHandler, QuitHandler, UserHandler},
    messaging::{NoticeHandler, PrivmsgHandler},
    mode::ModeHandler,
    server_query::{TimeHandler, VersionHandler},
    user_query::WhoisHandler,
};
use crate::state::{RegisteredState, UnregisteredState};

pub struct Registry {
    pre_reg: HashMap<&'static str, Box<dyn PreRegHandler>>,
    post_reg: HashMap<&'static str, Box<dyn PostRegHandler>>,
    universal: HashMap<&'static str, Box<dyn UniversalHandler>>,
}

impl Registry {
    pub fn new() -> Self {
        let mut pre_reg: HashMap<&'static str, Box<dyn PreRegHandler>> = HashMap::new();
        let mut post_reg: HashMap<&'static str, Box<dyn PostRegHandler>> = HashMap::new();
        let mut universal: HashMap<&'static str, Box<dyn UniversalHandler>> = HashMap::new();

        // Registration
        pre_reg.insert("NICK", Box::new(NickHandler));
        pre_reg.insert("USER", Box::new(UserHandler));
        post_reg.insert("NICK", Box::new(NickHandler));
        post_reg.insert("USER", Box::new(UserHandler));

        // Channels
        post_reg.insert("JOIN", Box::new(JoinHandler));
        post_reg.insert("PART", Box::new(PartHandler));
        post_reg.insert("TOPIC", Box::new(TopicHandler));
        post_reg.insert("NAMES", Box::new(NamesHandler));
        post_reg.insert("LIST", Box::new(ListHandler));
        post_reg.insert("KICK", Box::new(KickHandler));
        post_reg.insert("MODE", Box::new(ModeHandler));

        // Messaging and queries
        post_reg.insert("PRIVMSG", Box::new(PrivmsgHandler));
        post_reg.insert("NOTICE", Box::new(NoticeHandler));
        post_reg.insert("WHOIS", Box::new(WhoisHandler));

        // Any phase
        universal.insert("QUIT", Box::new(QuitHandler));
        universal.insert("PING", Box::new(PingHandler));
        universal.insert("PONG", Box::new(PongHandler));
        universal.insert("VERSION", Box::new(VersionHandler));
        universal.insert("TIME", Box::new(TimeHandler));

        Self {
            pre_reg,
            post_reg,
            universal,
        }
    }

    /// Dispatch a command from a connection that has not registered yet.
    pub async fn dispatch_pre_reg(
        &self,
        ctx: &mut Context<'_, UnregisteredState>,
        msg: &Message,
    ) -> HandlerResult {
        let verb = msg.verb.as_str();
        let span = debug_span!(
            "irc.command",
            command = %verb,
            uid = %ctx.uid,
            registered = false,
            remote_addr = %ctx.remote_addr,
        );

        let result = async {
            if let Some(handler) = self.universal.get(verb) {
                return handler.handle(&mut ctx.as_session(), msg).await;
            }
            if let Some(handler) = self.pre_reg.get(verb) {
                return handler.handle(ctx, msg).await;
            }
            if self.post_reg.contains_key(verb) {
                return Err(HandlerError::NotRegistered);
            }
            Err(HandlerError::UnknownCommand(verb.to_string()))
        }
        .instrument(span)
        .await;

        log_error(verb, &result);
        result
    }

    /// Dispatch a command from a registered connection.
    pub async fn dispatch_post_reg(
        &self,
        ctx: &mut Context<'_, RegisteredState>,
        msg: &Message,
    ) -> HandlerResult {
        let verb = msg.verb.as_str();
        let channel = msg
            .arg(0)
            .filter(|a| tinyirc_proto::is_channel_name(a));
        let span = debug_span!(
            "irc.command",
            command = %verb,
            uid = %ctx.uid,
            source_nick = %ctx.state.nick,
            channel = channel,
            remote_addr = %ctx.remote_addr,
        );

        let result = async {
            if let Some(handler) = self.universal.get(verb) {
                return handler.handle(&mut ctx.as_session(), msg).await;
            }
            if let Some(handler) = self.post_reg.get(verb) {
                return handler.handle(ctx, msg).await;
            }
            Err(HandlerError::UnknownCommand(verb.to_string()))
        }
        .instrument(span)
        .await;

        log_error(verb, &result);
        result
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn log_error(verb: &str, result: &HandlerResult) {
    if let Err(e) = result
        && !matches!(e, HandlerError::Quit(_))
    {
        debug!(
            command = %verb,
            error = %e,
            code = e.error_code(),
            kind = %e.kind(),
            "Command error"
        );
    }
}
