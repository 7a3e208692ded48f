//! QUIT command handler.

use async_trait::async_trait;
use tinyirc_proto::Message;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::{Context, UniversalHandler};
use crate::state::SessionState;

/// Handler for QUIT command.
///
/// Ends the session by returning [`HandlerError::Quit`]; the connection
/// performs the cleanup.
pub struct QuitHandler;

#[async_trait]
impl UniversalHandler for QuitHandler {
    async fn handle(&self, _ctx: &mut Context<'_, dyn SessionState>, msg: &Message) -> HandlerResult {
        // QUIT [:reason]
        let reason = msg.arg(0).filter(|r| !r.is_empty()).map(str::to_string);
        Err(HandlerError::Quit(reason))
    }
}
