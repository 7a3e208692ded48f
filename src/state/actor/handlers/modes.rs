//! Channel MODE changes.

use super::{ChannelActor, ChannelError, ModeOutcome, ModeRequest, Uid};
use std::sync::Arc;
use tinyirc_proto::{format_channel_modes, Message, Prefix};
use tokio::sync::oneshot;

impl ChannelActor {
    /// Apply each change in order. Only changes that altered the channel are
    /// announced, in a single MODE line.
    pub(crate) fn handle_apply_modes(
        &mut self,
        sender_uid: Uid,
        sender_prefix: Prefix,
        requests: Vec<ModeRequest>,
        reply_tx: oneshot::Sender<Result<ModeOutcome, ChannelError>>,
    ) {
        if let Err(e) = self.channel.require_operator(&sender_uid) {
            let _ = reply_tx.send(Err(e));
            return;
        }

        let mut outcome = ModeOutcome::default();
        for request in requests {
            match self.channel.apply_mode(
                &sender_uid,
                &request.change,
                request.target_uid.as_deref(),
            ) {
                Ok(true) => outcome.applied.push(request.change),
                Ok(false) => {}
                Err(e) => outcome.rejected.push(e),
            }
        }

        if !outcome.applied.is_empty() {
            let mut args = vec![self.channel.name.clone()];
            args.extend(format_channel_modes(&outcome.applied));
            let mode_msg = Arc::new(Message::new("MODE", args).with_prefix(sender_prefix));
            self.fan_out(&mode_msg, &[]);
        }

        let _ = reply_tx.send(Ok(outcome));
    }
}
