//! Channel registry.
//!
//! Maps channel names to running [`ChannelActor`]s. The registry only routes;
//! everything about a channel's membership lives inside its actor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::error::ChannelError;
use crate::state::actor::{ActorSettings, ChannelActor, ChannelEvent};
use crate::state::Matrix;

/// Address of one running channel actor.
#[derive(Clone, Debug)]
pub struct ChannelHandle {
    /// Generation number, unique for the life of the server.
    pub id: u64,
    pub name: String,
    pub tx: mpsc::Sender<ChannelEvent>,
}

impl ChannelHandle {
    /// Send an event carrying a reply channel and wait for the answer.
    ///
    /// An actor that stopped (pruned between lookup and send) reads as
    /// [`ChannelError::ChannelTombstone`].
    pub async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ChannelEvent,
    ) -> Result<T, ChannelError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| ChannelError::ChannelTombstone)?;
        reply_rx.await.map_err(|_| ChannelError::ChannelTombstone)
    }

    /// Send an event without waiting for it to be processed.
    pub async fn send(&self, event: ChannelEvent) -> Result<(), ChannelError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ChannelError::ChannelTombstone)
    }
}

pub struct ChannelManager {
    pub channels: DashMap<String, ChannelHandle>,
    next_id: AtomicU64,
    mailbox_capacity: usize,
    settings: Arc<ActorSettings>,
}

impl ChannelManager {
    pub fn new(settings: ActorSettings, mailbox_capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            next_id: AtomicU64::new(1),
            mailbox_capacity,
            settings: Arc::new(settings),
        }
    }

    pub fn get(&self, name: &str) -> Option<ChannelHandle> {
        self.channels.get(name).map(|h| h.value().clone())
    }

    /// Look up `name`, spawning its actor if it does not exist yet.
    /// Returns whether this call created it.
    pub fn get_or_create(&self, name: &str, matrix: Weak<Matrix>) -> (ChannelHandle, bool) {
        match self.channels.entry(name.to_string()) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let tx = ChannelActor::spawn(
                    name.to_string(),
                    id,
                    Arc::clone(&self.settings),
                    matrix,
                    self.mailbox_capacity,
                );
                let handle = ChannelHandle {
                    id,
                    name: name.to_string(),
                    tx,
                };
                slot.insert(handle.clone());
                debug!(channel = %name, id, "Channel created");
                (handle, true)
            }
        }
    }

    /// Drop the registry entry for `name` if it still belongs to actor `id`.
    pub fn remove_if_current(&self, name: &str, id: u64) -> bool {
        self.channels.remove_if(name, |_, h| h.id == id).is_some()
    }

    /// Snapshot of every registered channel, sorted by name.
    pub fn handles(&self) -> Vec<ChannelHandle> {
        let mut handles: Vec<_> = self.channels.iter().map(|h| h.value().clone()).collect();
        handles.sort_by(|a, b| a.name.cmp(&b.name));
        handles
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
