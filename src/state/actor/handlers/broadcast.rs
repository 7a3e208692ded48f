//! Fan-out to channel members.
//!
//! Every delivery is a `try_send` into the member's bounded queue. A full or
//! closed queue never blocks the actor; the member is handed to the
//! disconnect worker instead and everyone else still gets the message.

use super::{ChannelActor, NotifiedSet};
use std::sync::Arc;
use tinyirc_proto::Message;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

impl ChannelActor {
    /// Queue `message` for every member not in `exclude`.
    pub(crate) fn fan_out(&self, message: &Arc<Message>, exclude: &[&str]) {
        for (uid, sender) in &self.senders {
            if exclude.contains(&uid.as_str()) {
                continue;
            }
            self.try_deliver(uid, sender, Arc::clone(message));
        }
    }

    /// Like [`fan_out`](Self::fan_out), skipping members already in `notified`
    /// and recording the rest.
    pub(crate) fn fan_out_once(&self, message: &Arc<Message>, notified: &NotifiedSet) {
        let mut seen = notified.lock();
        for (uid, sender) in &self.senders {
            if seen.insert(uid.clone()) {
                self.try_deliver(uid, sender, Arc::clone(message));
            }
        }
    }

    /// Queue `message` for a single member.
    pub(crate) fn deliver(&self, uid: &str, message: Arc<Message>) {
        if let Some(sender) = self.senders.get(uid) {
            self.try_deliver(uid, sender, message);
        }
    }

    pub(crate) fn try_deliver(
        &self,
        uid: &str,
        sender: &mpsc::Sender<Arc<Message>>,
        message: Arc<Message>,
    ) {
        match sender.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(
                    channel = %self.channel.name,
                    uid = %uid,
                    "SendQ full, disconnecting member"
                );
                self.request_disconnect(uid, "SendQ exceeded");
            }
            Err(TrySendError::Closed(_)) => {
                self.request_disconnect(uid, "Connection closed");
            }
        }
    }
}
