//! KICK event handling.

use super::{ChannelActor, ChannelError, Uid};
use std::sync::Arc;
use tinyirc_proto::{Message, Prefix};
use tokio::sync::oneshot;
use tracing::debug;

impl ChannelActor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn handle_kick(
        &mut self,
        sender_uid: Uid,
        sender_prefix: Prefix,
        target_uid: Uid,
        target_nick: String,
        reason: String,
        reply_tx: oneshot::Sender<Result<(), ChannelError>>,
    ) {
        if let Err(e) = self.channel.kick(&sender_uid, &target_uid, &target_nick) {
            let _ = reply_tx.send(Err(e));
            return;
        }

        let kick_msg = Arc::new(
            Message::new(
                "KICK",
                vec![self.channel.name.clone(), target_nick, reason],
            )
            .with_prefix(sender_prefix),
        );

        // The target is already out of the member list; tell them directly.
        if let Some(sender) = self.senders.remove(&target_uid) {
            self.try_deliver(&target_uid, &sender, Arc::clone(&kick_msg));
        }
        self.fan_out(&kick_msg, &[]);

        // Keep the user's own channel set in step with the actor.
        if let Some(matrix) = self.matrix.upgrade()
            && let Some(user) = matrix.user_manager.get(&target_uid)
        {
            user.write().channels.remove(&self.channel.name);
        }

        debug!(channel = %self.channel.name, target = %target_uid, "Member kicked");
        self.cleanup_if_empty();
        let _ = reply_tx.send(Ok(()));
    }
}
