//! NOTICE command handler.

use async_trait::async_trait;
use tinyirc_proto::Message;
use tracing::debug;

use super::delivery::route;
use crate::error::HandlerResult;
use crate::handlers::core::{Context, PostRegHandler};
use crate::state::RegisteredState;

/// Handler for NOTICE command. Failures are logged, never replied to.
pub struct NoticeHandler;

#[async_trait]
impl PostRegHandler for NoticeHandler {
    async fn handle(&self, ctx: &mut Context<'_, RegisteredState>, msg: &Message) -> HandlerResult {
        let result = route(ctx, msg, |ctx, e| {
            debug!(uid = %ctx.uid, error = %e, "NOTICE not delivered");
        })
        .await;
        if let Err(e) = result {
            debug!(uid = %ctx.uid, error = %e, "NOTICE dropped");
        }
        Ok(())
    }
}
