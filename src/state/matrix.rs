//! The Matrix - central shared state for the server.
//!
//! Holds the user and channel registries plus the server's identity and the
//! settings handlers read at runtime. Shared as `Arc<Matrix>` by every
//! connection task; channel actors hold a `Weak` back-reference.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use parking_lot::Mutex;
use tinyirc_proto::Message;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info};

use crate::config::{ChannelsConfig, Config, IdleTimeoutsConfig, LimitsConfig};
use crate::state::actor::{ActorSettings, ChannelEvent, NotifiedSet};
use crate::state::channel::ChannelModes;
use crate::state::managers::channel::ChannelManager;
use crate::state::managers::lifecycle::LifecycleManager;
use crate::state::managers::user::UserManager;

/// This server's identity information.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub network: String,
    pub description: String,
    pub version: String,
    pub created: DateTime<Utc>,
}

/// Configuration accessible to handlers via Matrix.
#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub limits: LimitsConfig,
    pub timeouts: IdleTimeoutsConfig,
    pub channels: ChannelsConfig,
    /// Register on NICK alone, without USER.
    pub simple_handshake: bool,
}

pub struct Matrix {
    pub user_manager: UserManager,
    pub channel_manager: ChannelManager,
    pub lifecycle_manager: LifecycleManager,
    pub server_info: ServerInfo,
    pub config: MatrixConfig,
}

impl Matrix {
    pub fn new(config: &Config, disconnect_tx: mpsc::Sender<(String, String)>) -> Self {
        let server_info = ServerInfo {
            name: config.server.name.clone(),
            network: config.server.network.clone(),
            description: config.server.description.clone(),
            version: format!("tinyircd-{}", env!("CARGO_PKG_VERSION")),
            created: Utc::now(),
        };

        let actor_settings = ActorSettings {
            server_name: config.server.name.clone(),
            prune_empty: config.channels.prune_empty,
            initial_modes: ChannelModes {
                topic_restricted: config.channels.topic_lock_on_create,
                moderated: false,
            },
        };

        Self {
            user_manager: UserManager::new(config.server.sid.clone()),
            channel_manager: ChannelManager::new(
                actor_settings,
                config.limits.channel_mailbox_capacity,
            ),
            lifecycle_manager: LifecycleManager::new(disconnect_tx),
            server_info,
            config: MatrixConfig {
                limits: config.limits.clone(),
                timeouts: config.timeouts.clone(),
                channels: config.channels.clone(),
                simple_handshake: config.server.simple_handshake,
            },
        }
    }

    /// Schedule `uid` for removal without blocking.
    ///
    /// If the disconnect worker cannot take the request, the session's own
    /// shutdown token is cancelled instead; its event loop then ends and
    /// runs the same cleanup.
    pub fn request_disconnect(&self, uid: &str, reason: &str) {
        if self.lifecycle_manager.request_disconnect(uid, reason) {
            return;
        }
        if let Some(session) = self.user_manager.session(uid) {
            session.shutdown.cancel();
        }
    }

    /// Queue `message` for a single registered user.
    ///
    /// Returns false if the user is gone. A full or closed queue schedules
    /// the recipient's disconnect; the caller is never blocked.
    pub fn deliver(&self, uid: &str, message: Arc<Message>) -> bool {
        let Some(session) = self.user_manager.session(uid) else {
            return false;
        };
        match session.sender.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.request_disconnect(uid, "SendQ exceeded");
                true
            }
            Err(TrySendError::Closed(_)) => {
                self.request_disconnect(uid, "Connection closed");
                false
            }
        }
    }

    /// Remove a user from every channel and from the registry.
    ///
    /// Each channel the user was on announces `quit_reason` once, and each
    /// other user hears about it once however many channels they share. The
    /// session's shutdown token is cancelled so its task winds down. Safe to
    /// call more than once; only the first call does anything.
    pub async fn disconnect_user(&self, uid: &str, quit_reason: &str) -> bool {
        let Some(user) = self.user_manager.get(uid) else {
            return false;
        };

        let (prefix, nick, channels) = {
            let mut user = user.write();
            if user.quitting {
                return false;
            }
            user.quitting = true;
            (
                user.prefix(),
                user.nick.clone(),
                std::mem::take(&mut user.channels),
            )
        };

        if let Some(session) = self.user_manager.session(uid) {
            session.shutdown.cancel();
        }

        let quit_msg = Arc::new(Message::new("QUIT", [quit_reason]).with_prefix(prefix));
        let notified: NotifiedSet = Arc::new(Mutex::new(HashSet::from([uid.to_string()])));

        let handles: Vec<_> = channels
            .iter()
            .filter_map(|name| self.channel_manager.get(name))
            .collect();
        let acks = handles.iter().map(|handle| {
            handle.request(|reply_tx| ChannelEvent::Quit {
                uid: uid.to_string(),
                message: Arc::clone(&quit_msg),
                notified: Arc::clone(&notified),
                reply_tx: Some(reply_tx),
            })
        });
        for (handle, result) in handles.iter().zip(join_all(acks).await) {
            if result.is_err() {
                debug!(channel = %handle.name, uid = %uid, "Channel gone before QUIT");
            }
        }

        self.user_manager.remove(uid);
        info!(
            uid = %uid,
            nick = %nick,
            reason = %quit_reason,
            channels = channels.len(),
            "User disconnected"
        );
        true
    }
}
