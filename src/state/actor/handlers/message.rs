//! PRIVMSG / NOTICE delivery to channel members.

use super::{ChannelActor, ChannelError, Uid};
use std::sync::Arc;
use tinyirc_proto::Message;
use tokio::sync::oneshot;

impl ChannelActor {
    pub(crate) fn handle_message(
        &mut self,
        sender_uid: Uid,
        message: Arc<Message>,
        reply_tx: oneshot::Sender<Result<(), ChannelError>>,
    ) {
        if let Err(e) = self.channel.check_can_speak(&sender_uid) {
            let _ = reply_tx.send(Err(e));
            return;
        }

        self.fan_out(&message, &[sender_uid.as_str()]);
        let _ = reply_tx.send(Ok(()));
    }
}
