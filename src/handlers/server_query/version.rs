//! VERSION command handler.

use async_trait::async_trait;
use tinyirc_proto::{Message, Response};

use crate::error::HandlerResult;
use crate::handlers::core::{Context, UniversalHandler};
use crate::state::SessionState;

/// Handler for VERSION command.
pub struct VersionHandler;

#[async_trait]
impl UniversalHandler for VersionHandler {
    async fn handle(&self, ctx: &mut Context<'_, dyn SessionState>, _msg: &Message) -> HandlerResult {
        let info = &ctx.matrix.server_info;
        let params = vec![
            ctx.nick().to_string(),
            info.version.clone(),
            info.name.clone(),
            info.description.clone(),
        ];
        ctx.send_reply(Response::RPL_VERSION, params);
        Ok(())
    }
}
