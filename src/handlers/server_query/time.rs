//! TIME command handler.

use async_trait::async_trait;
use chrono::Utc;
use tinyirc_proto::{Message, Response};

use crate::error::HandlerResult;
use crate::handlers::core::{Context, UniversalHandler};
use crate::state::SessionState;

/// Handler for TIME command.
pub struct TimeHandler;

#[async_trait]
impl UniversalHandler for TimeHandler {
    async fn handle(&self, ctx: &mut Context<'_, dyn SessionState>, _msg: &Message) -> HandlerResult {
        let now = Utc::now().format("%A %B %d %Y -- %H:%M:%S +00:00").to_string();
        let params = vec![ctx.nick().to_string(), ctx.server_name().to_string(), now];
        ctx.send_reply(Response::RPL_TIME, params);
        Ok(())
    }
}
