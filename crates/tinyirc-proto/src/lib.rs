//! # tinyirc-proto
//!
//! Wire-level building blocks for the `tinyircd` chat server.
//!
//! Nothing in this crate knows about sessions, users or channels. It turns
//! bytes into lines, lines into [`Message`]s and back again, and answers
//! small syntactic questions (is this a nickname, is this a channel name,
//! what does this mode string mean).
//!
//! ```rust
//! use tinyirc_proto::Message;
//!
//! let msg: Message = "privmsg #demo :hello there".parse().unwrap();
//! assert_eq!(msg.verb, "PRIVMSG");
//! assert_eq!(msg.args, vec!["#demo", "hello there"]);
//! assert_eq!(msg.to_string(), "PRIVMSG #demo :hello there");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod error;
pub mod line;
pub mod message;
pub mod mode;
pub mod nick;
pub mod prefix;
pub mod response;
pub mod transport;

pub use self::chan::{is_channel_name, normalize_channel_name};
pub use self::error::{MessageParseError, ModeParseError, ProtocolError};
pub use self::line::{LineCodec, LineFrame};
pub use self::message::Message;
pub use self::mode::{
    format_channel_modes, parse_channel_modes, parse_user_modes, ChannelModeChange, UserModeChange,
};
pub use self::nick::{is_valid_nick, DEFAULT_NICK_MAX_LEN};
pub use self::prefix::Prefix;
pub use self::response::Response;
pub use self::transport::{Transport, TransportError};
