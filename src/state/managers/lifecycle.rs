//! Server lifecycle: shutdown signalling and disconnect requests.

use crate::state::Uid;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub struct LifecycleManager {
    /// Cancelled once when the server begins shutting down.
    pub shutdown: CancellationToken,

    /// Disconnect request channel.
    /// Channel actors use this to request disconnects without blocking.
    pub disconnect_tx: mpsc::Sender<(Uid, String)>,
}

impl LifecycleManager {
    pub fn new(disconnect_tx: mpsc::Sender<(Uid, String)>) -> Self {
        Self {
            shutdown: CancellationToken::new(),
            disconnect_tx,
        }
    }

    /// Ask the disconnect worker to remove `uid`. Never blocks.
    ///
    /// Returns false when the request queue is full or closed and the
    /// request was dropped.
    pub fn request_disconnect(&self, uid: &str, reason: &str) -> bool {
        match self
            .disconnect_tx
            .try_send((uid.to_string(), reason.to_string()))
        {
            Ok(()) => true,
            Err(_) => {
                warn!(uid = %uid, reason = %reason, "Disconnect queue unavailable, request dropped");
                false
            }
        }
    }
}
