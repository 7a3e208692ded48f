//! Actor model for channel state.
//!
//! Every channel is a [`ChannelActor`] running in its own task. The actor
//! owns the [`Channel`] aggregate and each member's outbound sender, and
//! handles [`ChannelEvent`]s strictly one after another. That gives each
//! channel a single total order of joins, parts and messages, and lets
//! unrelated channels proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tinyirc_proto::Message;
use tokio::sync::mpsc;
use tracing::debug;

use crate::state::channel::Channel;
use crate::state::Matrix;

mod handlers;
mod types;

pub use types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorState {
    Active,
    /// Emptied and removed from the registry; refuses new joins.
    Draining,
}

/// Owns the state of a single channel and processes events sequentially.
pub struct ChannelActor {
    channel: Channel,
    senders: HashMap<Uid, mpsc::Sender<Arc<Message>>>,
    /// Registry generation, so pruning never removes a newer channel of the same name.
    id: u64,
    settings: Arc<ActorSettings>,
    matrix: Weak<Matrix>,
    state: ActorState,
}

impl ChannelActor {
    fn new(name: String, id: u64, settings: Arc<ActorSettings>, matrix: Weak<Matrix>) -> Self {
        Self {
            channel: Channel::new(name, settings.initial_modes),
            senders: HashMap::new(),
            id,
            settings,
            matrix,
            state: ActorState::Active,
        }
    }

    /// Create a channel actor and spawn it.
    pub fn spawn(
        name: String,
        id: u64,
        settings: Arc<ActorSettings>,
        matrix: Weak<Matrix>,
        capacity: usize,
    ) -> mpsc::Sender<ChannelEvent> {
        let (tx, rx) = mpsc::channel(capacity);
        let actor = Self::new(name, id, settings, matrix);

        tokio::spawn(async move {
            actor.run(rx).await;
        });

        tx
    }

    /// Runs until every sender (registry entry and in-flight handles) is gone.
    async fn run(mut self, mut rx: mpsc::Receiver<ChannelEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        debug!(channel = %self.channel.name, "Channel actor stopped");
    }

    fn handle_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Join { params, reply_tx } => {
                self.handle_join(params, reply_tx);
            }
            ChannelEvent::Part {
                uid,
                prefix,
                reason,
                reply_tx,
            } => {
                self.handle_part(uid, prefix, reason, reply_tx);
            }
            ChannelEvent::Quit {
                uid,
                message,
                notified,
                reply_tx,
            } => {
                self.handle_quit(uid, message, notified, reply_tx);
            }
            ChannelEvent::Message {
                sender_uid,
                message,
                reply_tx,
            } => {
                self.handle_message(sender_uid, message, reply_tx);
            }
            ChannelEvent::SetTopic {
                sender_uid,
                sender_prefix,
                text,
                reply_tx,
            } => {
                self.handle_set_topic(sender_uid, sender_prefix, text, reply_tx);
            }
            ChannelEvent::Kick {
                sender_uid,
                sender_prefix,
                target_uid,
                target_nick,
                reason,
                reply_tx,
            } => {
                self.handle_kick(
                    sender_uid,
                    sender_prefix,
                    target_uid,
                    target_nick,
                    reason,
                    reply_tx,
                );
            }
            ChannelEvent::ApplyModes {
                sender_uid,
                sender_prefix,
                requests,
                reply_tx,
            } => {
                self.handle_apply_modes(sender_uid, sender_prefix, requests, reply_tx);
            }
            ChannelEvent::NickChange {
                uid,
                new_nick,
                message,
                notified,
            } => {
                self.handle_nick_change(uid, new_nick, message, notified);
            }
            ChannelEvent::GetInfo {
                requester_uid,
                reply_tx,
            } => {
                let is_member = requester_uid
                    .as_deref()
                    .is_some_and(|uid| self.channel.is_member(uid));
                let info = ChannelInfo {
                    name: self.channel.name.clone(),
                    topic: self.channel.topic.clone(),
                    modes: self.channel.modes,
                    member_count: self.channel.member_count(),
                    created: self.channel.created_at,
                    is_member,
                };
                let _ = reply_tx.send(info);
            }
            ChannelEvent::GetMembers { reply_tx } => {
                let members = self
                    .channel
                    .members()
                    .into_iter()
                    .map(|(uid, m)| MemberInfo {
                        uid: uid.clone(),
                        nick: m.nick.clone(),
                        op: m.op,
                        voice: m.voice,
                    })
                    .collect();
                let _ = reply_tx.send(members);
            }
        }
    }

    fn request_disconnect(&self, uid: &str, reason: &str) {
        if let Some(matrix) = self.matrix.upgrade() {
            matrix.request_disconnect(uid, reason);
        }
    }

    fn remove_member(&mut self, uid: &str) {
        let _ = self.channel.part(uid);
        self.senders.remove(uid);
    }

    fn cleanup_if_empty(&mut self) {
        if self.state == ActorState::Draining
            || !self.settings.prune_empty
            || !self.channel.is_empty()
        {
            return;
        }

        self.state = ActorState::Draining;
        debug!(channel = %self.channel.name, "Channel empty, pruning");
        if let Some(matrix) = self.matrix.upgrade() {
            matrix
                .channel_manager
                .remove_if_current(&self.channel.name, self.id);
        }
    }
}

#[cfg(test)]
mod tests;
