//! JOIN event handling.

use super::{ActorState, ChannelActor, ChannelError, JoinOutcome, JoinParams};
use crate::handlers::helpers::{names_replies, topic_replies};
use crate::state::channel::JoinResult;
use std::sync::Arc;
use tinyirc_proto::Message;
use tokio::sync::oneshot;
use tracing::debug;

impl ChannelActor {
    pub(crate) fn handle_join(
        &mut self,
        params: JoinParams,
        reply_tx: oneshot::Sender<Result<JoinOutcome, ChannelError>>,
    ) {
        let JoinParams {
            uid,
            nick,
            prefix,
            sender,
        } = params;

        if self.state == ActorState::Draining {
            let _ = reply_tx.send(Err(ChannelError::ChannelTombstone));
            return;
        }

        // The user's channel set is written under the same lock that
        // disconnect_user takes, so every member is reachable on disconnect.
        let user = match self.matrix.upgrade() {
            Some(matrix) => match matrix.user_manager.get(&uid) {
                Some(user) => Some(user),
                None => return self.refuse_join(reply_tx),
            },
            None => None,
        };
        let mut record = user.as_ref().map(|u| u.write());
        if record.as_ref().is_some_and(|u| u.quitting) {
            drop(record);
            return self.refuse_join(reply_tx);
        }
        let result = self.channel.join(&uid, &nick);
        if let Some(record) = record.as_mut() {
            record.channels.insert(self.channel.name.clone());
        }
        drop(record);

        let op = match result {
            JoinResult::AlreadyMember => {
                let _ = reply_tx.send(Ok(JoinOutcome::AlreadyMember));
                return;
            }
            JoinResult::Joined { op } => op,
        };
        self.senders.insert(uid.clone(), sender);

        let join_msg =
            Arc::new(Message::new("JOIN", vec![self.channel.name.clone()]).with_prefix(prefix));
        self.fan_out(&join_msg, &[uid.as_str()]);

        // The joiner's own echo, topic and names go through the same queue so
        // they arrive in order with whatever the channel sends next.
        self.deliver(&uid, join_msg);
        let server = self.settings.server_name.as_str();
        for reply in topic_replies(server, &nick, &self.channel.name, self.channel.topic.as_ref()) {
            self.deliver(&uid, Arc::new(reply));
        }
        for reply in names_replies(server, &nick, &self.channel.name, &self.channel.names()) {
            self.deliver(&uid, Arc::new(reply));
        }

        debug!(channel = %self.channel.name, uid = %uid, op, "Member joined");
        let _ = reply_tx.send(Ok(JoinOutcome::Joined { op }));
    }

    /// The joiner is gone or quitting. A channel created for this join is
    /// left empty, so prune it before answering.
    fn refuse_join(&mut self, reply_tx: oneshot::Sender<Result<JoinOutcome, ChannelError>>) {
        self.cleanup_if_empty();
        let _ = reply_tx.send(Err(ChannelError::SessionInvalid));
    }
}
