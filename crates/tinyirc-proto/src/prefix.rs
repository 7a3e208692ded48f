//! Message origin prefixes.

use std::fmt;

/// Origin of a message: the server itself or a user's `nick!user@host`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// Server name, e.g. `irc.example.net`.
    ServerName(String),
    /// (nickname, username, hostname)
    Nickname(String, String, String),
}

impl Prefix {
    /// Build a user prefix from its three components.
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::Nickname(nick.into(), user.into(), host.into())
    }

    /// Lenient parse of a prefix as received on the wire.
    ///
    /// A dot in the name part with no `!` or `@` after it is taken to be a
    /// server name.
    pub fn parse(s: &str) -> Self {
        let (name, rest) = match s.find(['!', '@']) {
            Some(idx) => (&s[..idx], &s[idx..]),
            None => (s, ""),
        };

        if rest.is_empty() {
            return if name.contains('.') {
                Prefix::ServerName(name.to_string())
            } else {
                Prefix::Nickname(name.to_string(), String::new(), String::new())
            };
        }

        let (user, host) = match rest.strip_prefix('!') {
            Some(after_bang) => match after_bang.split_once('@') {
                Some((user, host)) => (user, host),
                None => (after_bang, ""),
            },
            None => ("", rest.trim_start_matches('@')),
        };

        Prefix::Nickname(name.to_string(), user.to_string(), host.to_string())
    }

    /// The nickname, if this is a user prefix.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) => Some(nick),
            Prefix::ServerName(_) => None,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::Nickname(nick, user, host) => {
                f.write_str(nick)?;
                if !user.is_empty() {
                    write!(f, "!{user}")?;
                }
                if !host.is_empty() {
                    write!(f, "@{host}")?;
                }
                Ok(())
            }
        }
    }
}
