//! TOPIC changes.

use super::{ChannelActor, ChannelError, Uid};
use std::sync::Arc;
use tinyirc_proto::{Message, Prefix};
use tokio::sync::oneshot;

impl ChannelActor {
    pub(crate) fn handle_set_topic(
        &mut self,
        sender_uid: Uid,
        sender_prefix: Prefix,
        text: String,
        reply_tx: oneshot::Sender<Result<(), ChannelError>>,
    ) {
        let set_by = sender_prefix.to_string();
        let now = chrono::Utc::now().timestamp();
        if let Err(e) = self.channel.set_topic(&sender_uid, &text, &set_by, now) {
            let _ = reply_tx.send(Err(e));
            return;
        }

        let topic_msg = Arc::new(
            Message::new("TOPIC", vec![self.channel.name.clone(), text]).with_prefix(sender_prefix),
        );
        self.fan_out(&topic_msg, &[]);
        let _ = reply_tx.send(Ok(()));
    }
}
