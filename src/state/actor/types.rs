//! Channel actor types and events.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tinyirc_proto::{ChannelModeChange, Message, Prefix};
use tokio::sync::{mpsc, oneshot};

pub use crate::error::ChannelError;
pub use crate::state::channel::{ChannelModes, Topic};
pub use crate::state::Uid;

/// Fixed per-channel settings, shared by every actor.
#[derive(Debug, Clone)]
pub struct ActorSettings {
    pub server_name: String,
    pub prune_empty: bool,
    pub initial_modes: ChannelModes,
}

/// Recipients already reached by a notice that several channels deliver
/// (NICK, QUIT); each user gets it once no matter how many channels they share.
pub type NotifiedSet = Arc<Mutex<HashSet<Uid>>>;

/// Who is joining.
#[derive(Debug)]
pub struct JoinParams {
    pub uid: Uid,
    pub nick: String,
    pub prefix: Prefix,
    pub sender: mpsc::Sender<Arc<Message>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Added; `op` is true for the first member.
    Joined { op: bool },
    AlreadyMember,
}

/// A parsed mode change with its nickname argument resolved to a uid.
#[derive(Debug, Clone)]
pub struct ModeRequest {
    pub change: ChannelModeChange,
    pub target_uid: Option<Uid>,
}

/// Result of an `ApplyModes` request from an operator.
#[derive(Debug, Default)]
pub struct ModeOutcome {
    /// Changes that altered the channel, already broadcast.
    pub applied: Vec<ChannelModeChange>,
    /// Per-change failures (e.g. target not a member).
    pub rejected: Vec<ChannelError>,
}

/// Snapshot used by LIST, TOPIC and MODE queries.
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub name: String,
    pub topic: Option<Topic>,
    pub modes: ChannelModes,
    pub member_count: usize,
    pub created: i64,
    pub is_member: bool,
}

/// One member as seen by NAMES and WHOIS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub uid: Uid,
    pub nick: String,
    pub op: bool,
    pub voice: bool,
}

impl MemberInfo {
    pub fn prefix(&self) -> &'static str {
        if self.op {
            "@"
        } else if self.voice {
            "+"
        } else {
            ""
        }
    }
}

/// Events processed by a channel actor, one at a time, in arrival order.
#[derive(Debug)]
pub enum ChannelEvent {
    Join {
        params: JoinParams,
        reply_tx: oneshot::Sender<Result<JoinOutcome, ChannelError>>,
    },
    Part {
        uid: Uid,
        prefix: Prefix,
        reason: Option<String>,
        reply_tx: oneshot::Sender<Result<(), ChannelError>>,
    },
    /// The user is disconnecting. A no-op if they are not a member.
    Quit {
        uid: Uid,
        message: Arc<Message>,
        notified: NotifiedSet,
        reply_tx: Option<oneshot::Sender<()>>,
    },
    /// PRIVMSG / NOTICE from a member.
    Message {
        sender_uid: Uid,
        message: Arc<Message>,
        reply_tx: oneshot::Sender<Result<(), ChannelError>>,
    },
    SetTopic {
        sender_uid: Uid,
        sender_prefix: Prefix,
        text: String,
        reply_tx: oneshot::Sender<Result<(), ChannelError>>,
    },
    Kick {
        sender_uid: Uid,
        sender_prefix: Prefix,
        target_uid: Uid,
        target_nick: String,
        reason: String,
        reply_tx: oneshot::Sender<Result<(), ChannelError>>,
    },
    ApplyModes {
        sender_uid: Uid,
        sender_prefix: Prefix,
        requests: Vec<ModeRequest>,
        reply_tx: oneshot::Sender<Result<ModeOutcome, ChannelError>>,
    },
    NickChange {
        uid: Uid,
        new_nick: String,
        message: Arc<Message>,
        notified: NotifiedSet,
    },
    GetInfo {
        requester_uid: Option<Uid>,
        reply_tx: oneshot::Sender<ChannelInfo>,
    },
    GetMembers {
        reply_tx: oneshot::Sender<Vec<MemberInfo>>,
    },
}
