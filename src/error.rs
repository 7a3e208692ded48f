//! Unified error handling for tinyircd.
//!
//! Handler and channel errors carry their own numeric reply and map onto a
//! coarse [`ErrorKind`] used for logging and for deciding whether a session
//! survives the error.

use std::fmt;

use thiserror::Error;
use tinyirc_proto::{Message, Response, TransportError};

// ============================================================================
// Error taxonomy
// ============================================================================

/// Coarse error classes. Only `Transport` ends a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or unknown command, bad arguments.
    Protocol,
    /// Operator-only or membership-gated action by someone not allowed.
    Authorization,
    /// Unknown nickname or channel.
    NotFound,
    /// Peer gone; the session ends and is cleaned up.
    Transport,
    /// Nickname collision; the client must retry.
    StateConflict,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Protocol => "protocol",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Transport => "transport",
            Self::StateConflict => "state_conflict",
        })
    }
}

fn reply(server_name: &str, response: Response, args: Vec<String>) -> Message {
    Message::numeric(server_name, response, args)
}

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("no nickname given")]
    NoNicknameGiven,

    #[error("no recipient given")]
    NoRecipient,

    #[error("no text to send")]
    NoTextToSend,

    #[error("no origin specified")]
    NoOrigin,

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("not registered")]
    NotRegistered,

    #[error("already registered")]
    AlreadyRegistered,

    #[error("no such nick: {0}")]
    NoSuchNick(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("unknown channel mode: {0}")]
    UnknownMode(char),

    #[error("unknown user mode flag")]
    UnknownUserMode,

    #[error("cannot change mode for other users")]
    UsersDontMatch,

    #[error("{channel}: {source}")]
    Channel {
        channel: String,
        #[source]
        source: ChannelError,
    },

    #[error("client quit: {0:?}")]
    Quit(Option<String>),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Wrap a channel error with the channel it happened on.
    pub fn channel(channel: impl Into<String>, source: ChannelError) -> Self {
        Self::Channel {
            channel: channel.into(),
            source,
        }
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::NoNicknameGiven => "no_nickname_given",
            Self::NoRecipient => "no_recipient",
            Self::NoTextToSend => "no_text_to_send",
            Self::NoOrigin => "no_origin",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::ErroneousNickname(_) => "erroneous_nickname",
            Self::NotRegistered => "not_registered",
            Self::AlreadyRegistered => "already_registered",
            Self::NoSuchNick(_) => "no_such_nick",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::UnknownCommand(_) => "unknown_command",
            Self::UnknownMode(_) => "unknown_mode",
            Self::UnknownUserMode => "unknown_user_mode",
            Self::UsersDontMatch => "users_dont_match",
            Self::Channel { source, .. } => source.error_code(),
            Self::Quit(_) => "quit",
            Self::Transport(_) => "transport",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NicknameInUse(_) => ErrorKind::StateConflict,
            Self::NoSuchNick(_) | Self::NoSuchChannel(_) => ErrorKind::NotFound,
            Self::UsersDontMatch => ErrorKind::Authorization,
            Self::Channel { source, .. } => source.kind(),
            Self::Quit(_) | Self::Transport(_) => ErrorKind::Transport,
            _ => ErrorKind::Protocol,
        }
    }

    /// Convert to an IRC error reply message.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        let nick = nick.to_string();
        let (response, args) = match self {
            Self::NeedMoreParams => (
                Response::ERR_NEEDMOREPARAMS,
                vec![nick, cmd_name.to_string(), "Not enough parameters".into()],
            ),
            Self::NoNicknameGiven => (
                Response::ERR_NONICKNAMEGIVEN,
                vec![nick, "No nickname given".into()],
            ),
            Self::NoRecipient => (
                Response::ERR_NORECIPIENT,
                vec![nick, format!("No recipient given ({cmd_name})")],
            ),
            Self::NoTextToSend => (
                Response::ERR_NOTEXTTOSEND,
                vec![nick, "No text to send".into()],
            ),
            Self::NoOrigin => (
                Response::ERR_NOORIGIN,
                vec![nick, "No origin specified".into()],
            ),
            Self::NicknameInUse(bad) => (
                Response::ERR_NICKNAMEINUSE,
                vec![nick, bad.clone(), "Nickname is already in use".into()],
            ),
            Self::ErroneousNickname(bad) => (
                Response::ERR_ERRONEUSNICKNAME,
                vec![nick, bad.clone(), "Erroneous nickname".into()],
            ),
            Self::NotRegistered => (
                Response::ERR_NOTREGISTERED,
                vec![nick, "You have not registered".into()],
            ),
            Self::AlreadyRegistered => (
                Response::ERR_ALREADYREGISTRED,
                vec![nick, "You may not reregister".into()],
            ),
            Self::NoSuchNick(target) => (
                Response::ERR_NOSUCHNICK,
                vec![nick, target.clone(), "No such nick/channel".into()],
            ),
            Self::NoSuchChannel(chan) => (
                Response::ERR_NOSUCHCHANNEL,
                vec![nick, chan.clone(), "No such channel".into()],
            ),
            Self::UnknownCommand(cmd) => (
                Response::ERR_UNKNOWNCOMMAND,
                vec![nick, cmd.clone(), "Unknown command".into()],
            ),
            Self::UnknownMode(c) => (
                Response::ERR_UNKNOWNMODE,
                vec![nick, c.to_string(), "is unknown mode char to me".into()],
            ),
            Self::UnknownUserMode => (
                Response::ERR_UMODEUNKNOWNFLAG,
                vec![nick, "Unknown MODE flag".into()],
            ),
            Self::UsersDontMatch => (
                Response::ERR_USERSDONTMATCH,
                vec![nick, "Cannot change mode for other users".into()],
            ),
            Self::Channel { channel, source } => {
                return source.to_irc_reply(server_name, &nick, channel);
            }
            Self::Quit(_) | Self::Transport(_) | Self::Internal(_) => return None,
        };

        Some(reply(server_name, response, args))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Channel Errors (actor operations)
// ============================================================================

/// Channel operation errors.
///
/// Every channel operation that returns one of these has left the channel
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("not on channel")]
    NotOnChannel,

    #[error("you're not channel operator")]
    ChanOpPrivsNeeded,

    #[error("user {0} is not on that channel")]
    UserNotInChannel(String),

    #[error("cannot send to channel")]
    CannotSendToChan,

    #[error("channel is being torn down")]
    ChannelTombstone,

    #[error("session invalid")]
    SessionInvalid,
}

impl ChannelError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotOnChannel => "not_on_channel",
            Self::ChanOpPrivsNeeded => "chanop_privs_needed",
            Self::UserNotInChannel(_) => "user_not_in_channel",
            Self::CannotSendToChan => "cannot_send_to_chan",
            Self::ChannelTombstone => "channel_tombstone",
            Self::SessionInvalid => "session_invalid",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOnChannel | Self::ChanOpPrivsNeeded | Self::CannotSendToChan => {
                ErrorKind::Authorization
            }
            Self::UserNotInChannel(_) => ErrorKind::NotFound,
            Self::ChannelTombstone => ErrorKind::StateConflict,
            Self::SessionInvalid => ErrorKind::Transport,
        }
    }

    /// Convert to an IRC error reply message.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, channel: &str) -> Option<Message> {
        let (response, args) = match self {
            Self::NotOnChannel => (
                Response::ERR_NOTONCHANNEL,
                vec![nick.to_string(), channel.to_string(), "You're not on that channel".to_string()],
            ),
            Self::ChanOpPrivsNeeded => (
                Response::ERR_CHANOPRIVSNEEDED,
                vec![nick.to_string(), channel.to_string(), "You're not channel operator".to_string()],
            ),
            Self::UserNotInChannel(target) => (
                Response::ERR_USERNOTINCHANNEL,
                vec![nick.to_string(), target.clone(), channel.to_string(), "They aren't on that channel".to_string()],
            ),
            Self::CannotSendToChan => (
                Response::ERR_CANNOTSENDTOCHAN,
                vec![nick.to_string(), channel.to_string(), "Cannot send to channel".to_string()],
            ),
            Self::ChannelTombstone | Self::SessionInvalid => return None,
        };

        Some(reply(server_name, response, args))
    }
}
