//! Error types for framing, parsing and mode handling.

use thiserror::Error;

/// Errors raised by the line codec.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// I/O error from the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line contained a control character the protocol forbids.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),
}

/// Reasons a line does not yield a command.
///
/// The session router treats every variant the same way: the line is
/// dropped without a reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageParseError {
    /// Nothing but whitespace.
    #[error("empty message")]
    Empty,

    /// A prefix with no verb after it.
    #[error("missing verb")]
    MissingVerb,

    /// The verb is neither alphabetic nor a three digit numeric.
    #[error("invalid verb: {0}")]
    InvalidVerb(String),
}

/// Errors from parsing a mode string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeParseError {
    /// A mode letter this server does not implement.
    #[error("unknown mode character: {0}")]
    UnknownMode(char),

    /// A mode that needs a nickname argument had none.
    #[error("mode '{0}' requires an argument")]
    MissingArgument(char),
}

/// Convenience alias for codec results.
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;
