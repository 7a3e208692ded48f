//! Per-connection session state.
//!
//! A connection starts in [`UnregisteredState`] and is *converted* into a
//! [`RegisteredState`] once the handshake is complete. Post-registration
//! handlers only ever see the latter, so they never check a flag.

use std::time::Instant;

/// Read access shared by both phases, used by handlers that run in either.
pub trait SessionState: Send {
    /// Current nickname, if one has been accepted.
    fn nick(&self) -> Option<&str>;

    fn is_registered(&self) -> bool;

    /// Nickname for numeric replies: the nick, or `*` before one is set.
    fn nick_or_star(&self) -> &str {
        self.nick().unwrap_or("*")
    }
}

// ============================================================================
// UnregisteredState
// ============================================================================

/// Handshake in progress. `nick` is only set once the nickname has been
/// claimed in the user registry.
#[derive(Debug, Default)]
pub struct UnregisteredState {
    pub nick: Option<String>,
    pub user: Option<String>,
    pub realname: Option<String>,
}

impl UnregisteredState {
    /// Whether enough has been received to finish registration.
    pub fn can_register(&self, simple_handshake: bool) -> bool {
        match (&self.nick, &self.user) {
            (Some(_), Some(_)) => true,
            (Some(_), None) => simple_handshake,
            _ => false,
        }
    }

    /// Consume the handshake state. On failure the state is handed back.
    ///
    /// With `simple_handshake`, a missing USER is filled in from the nick.
    pub fn try_register(self, simple_handshake: bool) -> Result<RegisteredState, Self> {
        if !self.can_register(simple_handshake) {
            return Err(self);
        }
        let Some(nick) = self.nick else {
            return Err(Self::default());
        };

        let user = self.user.unwrap_or_else(|| nick.clone());
        let realname = self.realname.unwrap_or_else(|| nick.clone());
        Ok(RegisteredState {
            nick,
            user,
            realname,
            last_activity: Instant::now(),
            ping_pending: false,
        })
    }
}

impl SessionState for UnregisteredState {
    fn nick(&self) -> Option<&str> {
        self.nick.as_deref()
    }

    fn is_registered(&self) -> bool {
        false
    }
}

// ============================================================================
// RegisteredState
// ============================================================================

/// Registered session.
#[derive(Debug)]
pub struct RegisteredState {
    pub nick: String,
    pub user: String,
    pub realname: String,
    /// Last time anything arrived from the client.
    pub last_activity: Instant,
    /// A keepalive PING is outstanding.
    pub ping_pending: bool,
}

impl RegisteredState {
    /// Record client activity; clears any outstanding keepalive.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
        self.ping_pending = false;
    }
}

impl SessionState for RegisteredState {
    fn nick(&self) -> Option<&str> {
        Some(&self.nick)
    }

    fn is_registered(&self) -> bool {
        true
    }
}
