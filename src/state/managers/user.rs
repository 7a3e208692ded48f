//! User registry.
//!
//! Three maps keyed the way they are looked up:
//! - `users`: uid → user record
//! - `nicks`: nickname → uid, the only place nickname uniqueness lives
//! - `sessions`: uid → the connection's outbound queue and shutdown token
//!
//! Nickname claims go through `DashMap::entry`, so checking and inserting
//! happen under the same shard lock.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tinyirc_proto::Message;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::state::{Uid, UidGenerator, User};

/// What other tasks need to reach a connection.
#[derive(Clone)]
pub struct SessionHandle {
    pub sender: mpsc::Sender<Arc<Message>>,
    /// Fired when the session must close (SendQ overflow, forced disconnect).
    pub shutdown: CancellationToken,
}

pub struct UserManager {
    pub users: DashMap<Uid, Arc<RwLock<User>>>,
    pub nicks: DashMap<String, Uid>,
    pub sessions: DashMap<Uid, SessionHandle>,
    pub uid_gen: UidGenerator,
}

impl UserManager {
    pub fn new(server_sid: String) -> Self {
        Self {
            users: DashMap::new(),
            nicks: DashMap::new(),
            sessions: DashMap::new(),
            uid_gen: UidGenerator::new(server_sid),
        }
    }

    /// Reserve `nick` for `uid`.
    ///
    /// Succeeds if the nick is free or already held by `uid`. Exactly one of
    /// any number of concurrent claims for a free nick wins.
    pub fn claim_nick(&self, uid: &str, nick: &str) -> Result<(), HandlerError> {
        match self.nicks.entry(nick.to_string()) {
            Entry::Occupied(holder) if holder.get() == uid => Ok(()),
            Entry::Occupied(_) => Err(HandlerError::NicknameInUse(nick.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(uid.to_string());
                Ok(())
            }
        }
    }

    /// Drop a claim, but only if `uid` still holds it.
    pub fn release_nick(&self, uid: &str, nick: &str) {
        self.nicks.remove_if(nick, |_, holder| holder == uid);
    }

    /// Publish a registered user. The nickname must already be claimed.
    pub fn add_local_user(&self, user: User, session: SessionHandle) -> Arc<RwLock<User>> {
        let uid = user.uid.clone();
        let user = Arc::new(RwLock::new(user));
        self.sessions.insert(uid.clone(), session);
        self.users.insert(uid, Arc::clone(&user));
        user
    }

    /// Change a registered user's nickname. Returns the old nickname.
    ///
    /// The new key is claimed before the old one is released; on failure the
    /// user keeps the old nickname and the registry is untouched.
    pub fn rename(&self, uid: &str, new_nick: &str) -> Result<String, HandlerError> {
        let user = self
            .get(uid)
            .ok_or_else(|| HandlerError::Internal(format!("rename of unknown uid {uid}")))?;
        let old_nick = user.read().nick.clone();
        if old_nick == new_nick {
            return Ok(old_nick);
        }

        self.claim_nick(uid, new_nick)?;
        user.write().nick = new_nick.to_string();
        self.release_nick(uid, &old_nick);

        // Raced with remove(), which may have read the old nick.
        if !self.users.contains_key(uid) {
            self.release_nick(uid, new_nick);
        }
        Ok(old_nick)
    }

    pub fn get(&self, uid: &str) -> Option<Arc<RwLock<User>>> {
        self.users.get(uid).map(|u| Arc::clone(u.value()))
    }

    /// Registered user currently holding `nick`.
    pub fn lookup(&self, nick: &str) -> Option<Arc<RwLock<User>>> {
        let uid = self.nicks.get(nick).map(|r| r.value().clone())?;
        self.get(&uid)
    }

    /// Uid of the registered user holding `nick`.
    pub fn resolve_nick(&self, nick: &str) -> Option<Uid> {
        self.lookup(nick).map(|u| u.read().uid.clone())
    }

    pub fn session(&self, uid: &str) -> Option<SessionHandle> {
        self.sessions.get(uid).map(|s| s.value().clone())
    }

    /// Remove every trace of `uid`. Only the first call returns the record.
    pub fn remove(&self, uid: &str) -> Option<(Arc<RwLock<User>>, Option<SessionHandle>)> {
        let (_, user) = self.users.remove(uid)?;
        let nick = user.read().nick.clone();
        self.release_nick(uid, &nick);
        let session = self.sessions.remove(uid).map(|(_, s)| s);
        Some((user, session))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
