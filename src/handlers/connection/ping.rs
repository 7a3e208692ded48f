//! PING and PONG handlers.

use async_trait::async_trait;
use tinyirc_proto::Message;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::{Context, UniversalHandler};
use crate::handlers::helpers::server_prefix;
use crate::state::SessionState;

/// Handler for PING command.
pub struct PingHandler;

#[async_trait]
impl UniversalHandler for PingHandler {
    async fn handle(&self, ctx: &mut Context<'_, dyn SessionState>, msg: &Message) -> HandlerResult {
        // PING <token>
        let token = msg.arg(0).ok_or(HandlerError::NoOrigin)?;
        let server_name = ctx.server_name().to_string();
        let pong = Message::new("PONG", [server_name.as_str(), token])
            .with_prefix(server_prefix(&server_name));
        ctx.reply(pong);
        Ok(())
    }
}

/// Handler for PONG command.
///
/// Any inbound line already counts as activity for the keepalive timer.
pub struct PongHandler;

#[async_trait]
impl UniversalHandler for PongHandler {
    async fn handle(&self, _ctx: &mut Context<'_, dyn SessionState>, _msg: &Message) -> HandlerResult {
        Ok(())
    }
}
