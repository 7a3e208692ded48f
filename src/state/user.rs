//! Connected users.

use std::collections::HashSet;

use tinyirc_proto::Prefix;

use super::Uid;

/// User modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserModes {
    /// +i: hidden from NAMES for people outside the channel.
    pub invisible: bool,
}

impl UserModes {
    pub fn as_mode_string(&self) -> String {
        if self.invisible {
            "+i".to_string()
        } else {
            "+".to_string()
        }
    }
}

/// A registered user.
///
/// Identity is the `uid`; the nickname can change at any time. Two `User`
/// values are equal when they are the same connection.
#[derive(Debug, Clone)]
pub struct User {
    pub uid: Uid,
    pub nick: String,
    pub user: String,
    pub realname: String,
    pub host: String,
    /// Names of joined channels, kept so disconnect cleanup does not need
    /// to scan every channel.
    pub channels: HashSet<String>,
    pub modes: UserModes,
    /// Unix timestamp of registration.
    pub signon: i64,
    /// Set once disconnect cleanup has started; no new memberships after that.
    pub quitting: bool,
}

impl User {
    pub fn new(uid: Uid, nick: String, user: String, realname: String, host: String) -> Self {
        Self {
            uid,
            nick,
            user,
            realname,
            host,
            channels: HashSet::new(),
            modes: UserModes::default(),
            signon: chrono::Utc::now().timestamp(),
            quitting: false,
        }
    }

    /// `nick!user@host` prefix for relayed messages.
    pub fn prefix(&self) -> Prefix {
        Prefix::new(self.nick.as_str(), self.user.as_str(), self.host.as_str())
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for User {}
