//! The channel aggregate.
//!
//! Plain data plus the rules for changing it. The owning
//! [`ChannelActor`](super::actor::ChannelActor) serializes access and does
//! the messaging; nothing here performs I/O.
//!
//! Operator and voice status are flags on a member's [`Membership`], so a
//! user cannot hold either without being a member.

use std::collections::HashMap;

use tinyirc_proto::ChannelModeChange;

use super::Uid;
use crate::error::ChannelError;

/// One member's standing in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// Join order, used to list members deterministically.
    pub seq: u64,
    pub nick: String,
    pub op: bool,
    pub voice: bool,
}

impl Membership {
    /// `@` for operators, `+` for voiced members.
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

/// Current topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub text: String,
    pub set_by: String,
    pub set_at: i64,
}

/// Channel flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelModes {
    /// +t: only operators change the topic.
    pub topic_restricted: bool,
    /// +m: only operators and voiced members speak.
    pub moderated: bool,
}

impl ChannelModes {
    pub fn as_mode_string(&self) -> String {
        let mut s = String::from("+");
        if self.moderated {
            s.push('m');
        }
        if self.topic_restricted {
            s.push('t');
        }
        s
    }
}

/// Outcome of [`Channel::join`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinResult {
    /// New member; `op` is true when they joined an empty channel.
    Joined { op: bool },
    AlreadyMember,
}

#[derive(Debug)]
pub struct Channel {
    pub name: String,
    pub topic: Option<Topic>,
    pub modes: ChannelModes,
    pub created_at: i64,
    members: HashMap<Uid, Membership>,
    next_seq: u64,
}

impl Channel {
    pub fn new(name: impl Into<String>, modes: ChannelModes) -> Self {
        Self {
            name: name.into(),
            topic: None,
            modes,
            created_at: chrono::Utc::now().timestamp(),
            members: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn is_member(&self, uid: &str) -> bool {
        self.members.contains_key(uid)
    }

    pub fn is_operator(&self, uid: &str) -> bool {
        self.members.get(uid).is_some_and(|m| m.op)
    }

    pub fn member(&self, uid: &str) -> Option<&Membership> {
        self.members.get(uid)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in join order.
    pub fn members(&self) -> Vec<(&Uid, &Membership)> {
        let mut members: Vec<_> = self.members.iter().collect();
        members.sort_by_key(|(_, m)| m.seq);
        members
    }

    pub fn operators(&self) -> impl Iterator<Item = &Uid> {
        self.members.iter().filter(|(_, m)| m.op).map(|(uid, _)| uid)
    }

    /// NAMES entries (`@alice`, `+bob`, `carol`) in join order.
    pub fn names(&self) -> Vec<String> {
        self.members()
            .into_iter()
            .map(|(_, m)| format!("{}{}", m.prefix(), m.nick))
            .collect()
    }

    /// Add `uid`. The first member of an empty channel becomes operator.
    pub fn join(&mut self, uid: &str, nick: &str) -> JoinResult {
        if self.members.contains_key(uid) {
            return JoinResult::AlreadyMember;
        }

        let op = self.members.is_empty();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.members.insert(
            uid.to_string(),
            Membership {
                seq,
                nick: nick.to_string(),
                op,
                voice: false,
            },
        );
        JoinResult::Joined { op }
    }

    /// Remove `uid`, dropping any operator or voice status with it.
    pub fn part(&mut self, uid: &str) -> Result<Membership, ChannelError> {
        self.members.remove(uid).ok_or(ChannelError::NotOnChannel)
    }

    pub fn rename_member(&mut self, uid: &str, nick: &str) -> bool {
        match self.members.get_mut(uid) {
            Some(member) => {
                member.nick = nick.to_string();
                true
            }
            None => false,
        }
    }

    /// Replace the topic. Members may always set it unless `+t` is on, in
    /// which case only operators may.
    pub fn set_topic(
        &mut self,
        actor: &str,
        text: &str,
        set_by: &str,
        now: i64,
    ) -> Result<(), ChannelError> {
        let member = self.members.get(actor).ok_or(ChannelError::NotOnChannel)?;
        if self.modes.topic_restricted && !member.op {
            return Err(ChannelError::ChanOpPrivsNeeded);
        }

        self.topic = Some(Topic {
            text: text.to_string(),
            set_by: set_by.to_string(),
            set_at: now,
        });
        Ok(())
    }

    pub fn require_operator(&self, actor: &str) -> Result<(), ChannelError> {
        match self.members.get(actor) {
            Some(m) if m.op => Ok(()),
            Some(_) => Err(ChannelError::ChanOpPrivsNeeded),
            None => Err(ChannelError::NotOnChannel),
        }
    }

    /// Grant or revoke operator status. Returns whether anything changed.
    pub fn set_operator(
        &mut self,
        actor: &str,
        target: &str,
        target_nick: &str,
        on: bool,
    ) -> Result<bool, ChannelError> {
        self.require_operator(actor)?;
        let member = self
            .members
            .get_mut(target)
            .ok_or_else(|| ChannelError::UserNotInChannel(target_nick.to_string()))?;
        let changed = member.op != on;
        member.op = on;
        Ok(changed)
    }

    /// Grant or revoke voice. Returns whether anything changed.
    pub fn set_voice(
        &mut self,
        actor: &str,
        target: &str,
        target_nick: &str,
        on: bool,
    ) -> Result<bool, ChannelError> {
        self.require_operator(actor)?;
        let member = self
            .members
            .get_mut(target)
            .ok_or_else(|| ChannelError::UserNotInChannel(target_nick.to_string()))?;
        let changed = member.voice != on;
        member.voice = on;
        Ok(changed)
    }

    /// Apply one parsed mode change on behalf of `actor`. `target` is the
    /// resolved uid for `o`/`v` changes.
    pub fn apply_mode(
        &mut self,
        actor: &str,
        change: &ChannelModeChange,
        target: Option<&str>,
    ) -> Result<bool, ChannelError> {
        self.require_operator(actor)?;
        match change {
            ChannelModeChange::TopicRestricted(on) => {
                let changed = self.modes.topic_restricted != *on;
                self.modes.topic_restricted = *on;
                Ok(changed)
            }
            ChannelModeChange::Moderated(on) => {
                let changed = self.modes.moderated != *on;
                self.modes.moderated = *on;
                Ok(changed)
            }
            ChannelModeChange::Operator(on, nick) => {
                let target = target.ok_or_else(|| ChannelError::UserNotInChannel(nick.clone()))?;
                self.set_operator(actor, target, nick, *on)
            }
            ChannelModeChange::Voice(on, nick) => {
                let target = target.ok_or_else(|| ChannelError::UserNotInChannel(nick.clone()))?;
                self.set_voice(actor, target, nick, *on)
            }
        }
    }

    /// Remove `target` on behalf of `actor`, who must be an operator.
    pub fn kick(
        &mut self,
        actor: &str,
        target: &str,
        target_nick: &str,
    ) -> Result<Membership, ChannelError> {
        self.require_operator(actor)?;
        self.members
            .remove(target)
            .ok_or_else(|| ChannelError::UserNotInChannel(target_nick.to_string()))
    }

    /// Members may speak; in `+m` channels only operators and voiced members.
    pub fn check_can_speak(&self, uid: &str) -> Result<(), ChannelError> {
        match self.members.get(uid) {
            None => Err(ChannelError::CannotSendToChan),
            Some(m) if self.modes.moderated && !(m.op || m.voice) => {
                Err(ChannelError::CannotSendToChan)
            }
            Some(_) => Ok(()),
        }
    }
}
