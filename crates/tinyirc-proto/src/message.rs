//! Parsed protocol lines.
//!
//! A line has the shape `[:prefix] VERB [arg ...] [:trailing text]`. Parsing
//! is a pure function of the line; it performs no I/O and keeps no state.

use std::fmt;
use std::str::FromStr;

use crate::error::MessageParseError;
use crate::prefix::Prefix;
use crate::response::Response;

/// One protocol command or reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Origin, present on lines the server relays or originates.
    pub prefix: Option<Prefix>,
    /// Upper-cased verb or zero-padded numeric.
    pub verb: String,
    /// Arguments in order; the trailing argument, if any, is last.
    pub args: Vec<String>,
}

impl Message {
    /// Create a message without a prefix.
    pub fn new<V, I, A>(verb: V, args: I) -> Self
    where
        V: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            prefix: None,
            verb: verb.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a numeric reply originating from `server_name`.
    pub fn numeric(server_name: &str, response: Response, args: Vec<String>) -> Self {
        Self {
            prefix: Some(Prefix::ServerName(server_name.to_string())),
            verb: response.to_string(),
            args,
        }
    }

    /// Attach a prefix.
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Argument at `idx`, if present.
    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.args.get(idx).map(String::as_str)
    }

    /// Nickname from the prefix, if it is a user prefix.
    pub fn source_nick(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }
}

fn is_valid_verb(verb: &str) -> bool {
    let numeric = verb.len() == 3 && verb.bytes().all(|b| b.is_ascii_digit());
    numeric || verb.bytes().all(|b| b.is_ascii_alphabetic())
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut rest = line.trim_end_matches(['\r', '\n']).trim_start_matches(' ');
        if rest.is_empty() {
            return Err(MessageParseError::Empty);
        }

        let prefix = match rest.strip_prefix(':') {
            Some(after) => {
                let (raw, tail) = after.split_once(' ').unwrap_or((after, ""));
                rest = tail.trim_start_matches(' ');
                Some(Prefix::parse(raw))
            }
            None => None,
        };

        let (verb, mut tail) = rest.split_once(' ').unwrap_or((rest, ""));
        if verb.is_empty() {
            return Err(MessageParseError::MissingVerb);
        }
        if !is_valid_verb(verb) {
            return Err(MessageParseError::InvalidVerb(verb.to_string()));
        }

        let mut args = Vec::new();
        loop {
            tail = tail.trim_start_matches(' ');
            if tail.is_empty() {
                break;
            }
            if let Some(trailing) = tail.strip_prefix(':') {
                args.push(trailing.to_string());
                break;
            }
            let (arg, next) = tail.split_once(' ').unwrap_or((tail, ""));
            args.push(arg.to_string());
            tail = next;
        }

        Ok(Self {
            prefix,
            verb: verb.to_ascii_uppercase(),
            args,
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{prefix} ")?;
        }
        f.write_str(&self.verb)?;

        if let Some((last, middle)) = self.args.split_last() {
            for arg in middle {
                write!(f, " {arg}")?;
            }
            if last.is_empty() || last.contains(' ') || last.starts_with(':') {
                write!(f, " :{last}")?;
            } else {
                write!(f, " {last}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_is_upper_cased() {
        let msg: Message = "join #demo".parse().unwrap();
        assert_eq!(msg.verb, "JOIN");
        assert_eq!(msg.args, vec!["#demo"]);
        assert!(msg.prefix.is_none());
    }

    #[test]
    fn trailing_keeps_spaces_and_colons() {
        let msg: Message = "PRIVMSG #demo :hi there :)\r\n".parse().unwrap();
        assert_eq!(msg.args, vec!["#demo", "hi there :)"]);
    }

    #[test]
    fn runs_of_spaces_separate_args() {
        let msg: Message = "  KICK   #demo    bob   :spam".parse().unwrap();
        assert_eq!(msg.verb, "KICK");
        assert_eq!(msg.args, vec!["#demo", "bob", "spam"]);
    }

    #[test]
    fn empty_trailing_is_an_argument() {
        let msg: Message = "TOPIC #demo :".parse().unwrap();
        assert_eq!(msg.args, vec!["#demo", ""]);
    }

    #[test]
    fn prefix_is_parsed() {
        let msg: Message = ":alice!al@host PRIVMSG bob :yo".parse().unwrap();
        assert_eq!(msg.source_nick(), Some("alice"));
        assert_eq!(msg.arg(0), Some("bob"));
        assert_eq!(msg.arg(1), Some("yo"));
        assert_eq!(msg.arg(2), None);
    }

    #[test]
    fn unparseable_lines_yield_no_command() {
        assert_eq!("".parse::<Message>(), Err(MessageParseError::Empty));
        assert_eq!("   \r\n".parse::<Message>(), Err(MessageParseError::Empty));
        assert_eq!(":alice!a@h".parse::<Message>(), Err(MessageParseError::MissingVerb));
        assert_eq!(
            "J0IN #x".parse::<Message>(),
            Err(MessageParseError::InvalidVerb("J0IN".into()))
        );
    }

    #[test]
    fn numerics_are_accepted() {
        let msg: Message = ":srv.local 001 alice :Welcome".parse().unwrap();
        assert_eq!(msg.verb, "001");
    }

    #[test]
    fn display_adds_colon_only_when_needed() {
        let msg = Message::new("PRIVMSG", ["#demo", "hi"]);
        assert_eq!(msg.to_string(), "PRIVMSG #demo hi");

        let msg = Message::new("PRIVMSG", ["#demo", "hi there"]);
        assert_eq!(msg.to_string(), "PRIVMSG #demo :hi there");

        let msg = Message::new("TOPIC", ["#demo", ""]);
        assert_eq!(msg.to_string(), "TOPIC #demo :");

        let msg = Message::new("QUIT", Vec::<String>::new())
            .with_prefix(Prefix::new("alice", "al", "host"));
        assert_eq!(msg.to_string(), ":alice!al@host QUIT");
    }

    #[test]
    fn numeric_constructor_uses_server_prefix() {
        let msg = Message::numeric(
            "srv.local",
            Response::RPL_WELCOME,
            vec!["alice".into(), "Welcome aboard".into()],
        );
        assert_eq!(msg.to_string(), ":srv.local 001 alice :Welcome aboard");
    }
}
