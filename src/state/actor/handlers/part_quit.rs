//! PART and QUIT event handling.

use super::{ChannelActor, ChannelError, NotifiedSet, Uid};
use std::sync::Arc;
use tinyirc_proto::{Message, Prefix};
use tokio::sync::oneshot;
use tracing::debug;

impl ChannelActor {
    pub(crate) fn handle_part(
        &mut self,
        uid: Uid,
        prefix: Prefix,
        reason: Option<String>,
        reply_tx: oneshot::Sender<Result<(), ChannelError>>,
    ) {
        if !self.channel.is_member(&uid) {
            let _ = reply_tx.send(Err(ChannelError::NotOnChannel));
            return;
        }

        let mut args = vec![self.channel.name.clone()];
        args.extend(reason);
        let part_msg = Arc::new(Message::new("PART", args).with_prefix(prefix));

        // The parting member sees their own PART.
        self.fan_out(&part_msg, &[]);
        self.remove_member(&uid);
        debug!(channel = %self.channel.name, uid = %uid, "Member parted");

        self.cleanup_if_empty();
        let _ = reply_tx.send(Ok(()));
    }

    pub(crate) fn handle_quit(
        &mut self,
        uid: Uid,
        message: Arc<Message>,
        notified: NotifiedSet,
        reply_tx: Option<oneshot::Sender<()>>,
    ) {
        if self.channel.is_member(&uid) {
            self.remove_member(&uid);
            self.fan_out_once(&message, &notified);
        }

        self.cleanup_if_empty();
        if let Some(tx) = reply_tx {
            let _ = tx.send(());
        }
    }

    pub(crate) fn handle_nick_change(
        &mut self,
        uid: Uid,
        new_nick: String,
        message: Arc<Message>,
        notified: NotifiedSet,
    ) {
        if self.channel.rename_member(&uid, &new_nick) {
            self.fan_out_once(&message, &notified);
        }
    }
}
