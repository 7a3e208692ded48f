//! Mode string parsing.
//!
//! Channel modes: `t` (topic restricted), `m` (moderated), `o` and `v`
//! (take a nickname). User modes: `i` (invisible).

use std::fmt;

use crate::error::ModeParseError;

/// One requested change to a channel's modes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelModeChange {
    /// `+t` / `-t`
    TopicRestricted(bool),
    /// `+m` / `-m`
    Moderated(bool),
    /// `+o nick` / `-o nick`
    Operator(bool, String),
    /// `+v nick` / `-v nick`
    Voice(bool, String),
}

impl ChannelModeChange {
    /// Whether this change sets (`+`) or clears (`-`) the mode.
    pub fn is_set(&self) -> bool {
        match self {
            Self::TopicRestricted(on) | Self::Moderated(on) => *on,
            Self::Operator(on, _) | Self::Voice(on, _) => *on,
        }
    }

    /// Mode letter.
    pub fn letter(&self) -> char {
        match self {
            Self::TopicRestricted(_) => 't',
            Self::Moderated(_) => 'm',
            Self::Operator(..) => 'o',
            Self::Voice(..) => 'v',
        }
    }

    /// Nickname argument for `o`/`v`.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Operator(_, nick) | Self::Voice(_, nick) => Some(nick),
            _ => None,
        }
    }
}

/// One requested change to a user's modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserModeChange {
    /// `+i` / `-i`
    Invisible(bool),
}

/// Render applied channel mode changes as `modestring [args...]`, merging
/// runs of the same sign (`+ov alice bob`).
pub fn format_channel_modes(changes: &[ChannelModeChange]) -> Vec<String> {
    let mut modes = String::new();
    let mut args = Vec::new();
    let mut sign = None;

    for change in changes {
        let wanted = if change.is_set() { '+' } else { '-' };
        if sign != Some(wanted) {
            modes.push(wanted);
            sign = Some(wanted);
        }
        modes.push(change.letter());
        if let Some(target) = change.target() {
            args.push(target.to_string());
        }
    }

    let mut out = Vec::with_capacity(args.len() + 1);
    out.push(modes);
    out.extend(args);
    out
}

impl fmt::Display for UserModeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserModeChange::Invisible(true) => f.write_str("+i"),
            UserModeChange::Invisible(false) => f.write_str("-i"),
        }
    }
}

/// Parse `+tm-o bob` style input. `args` are the arguments following the
/// mode string, consumed left to right by modes that need one.
pub fn parse_channel_modes<'a, I>(
    modestring: &str,
    args: I,
) -> Result<Vec<ChannelModeChange>, ModeParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut args = args.into_iter();
    let mut adding = true;
    let mut changes = Vec::new();

    for c in modestring.chars() {
        match c {
            '+' => adding = true,
            '-' => adding = false,
            't' => changes.push(ChannelModeChange::TopicRestricted(adding)),
            'm' => changes.push(ChannelModeChange::Moderated(adding)),
            'o' | 'v' => {
                let nick = args.next().ok_or(ModeParseError::MissingArgument(c))?;
                let nick = nick.to_string();
                changes.push(if c == 'o' {
                    ChannelModeChange::Operator(adding, nick)
                } else {
                    ChannelModeChange::Voice(adding, nick)
                });
            }
            other => return Err(ModeParseError::UnknownMode(other)),
        }
    }

    Ok(changes)
}

/// Parse a user mode string such as `+i` or `-i`.
pub fn parse_user_modes(modestring: &str) -> Result<Vec<UserModeChange>, ModeParseError> {
    let mut adding = true;
    let mut changes = Vec::new();

    for c in modestring.chars() {
        match c {
            '+' => adding = true,
            '-' => adding = false,
            'i' => changes.push(UserModeChange::Invisible(adding)),
            other => return Err(ModeParseError::UnknownMode(other)),
        }
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_and_targets() {
        let changes = parse_channel_modes("+to-v", ["alice", "bob"]).unwrap();
        assert_eq!(
            changes,
            vec![
                ChannelModeChange::TopicRestricted(true),
                ChannelModeChange::Operator(true, "alice".into()),
                ChannelModeChange::Voice(false, "bob".into()),
            ]
        );
    }

    #[test]
    fn missing_argument_is_reported() {
        assert_eq!(
            parse_channel_modes("+o", []),
            Err(ModeParseError::MissingArgument('o'))
        );
    }

    #[test]
    fn unknown_letters_are_reported() {
        assert_eq!(
            parse_channel_modes("+k", ["secret"]),
            Err(ModeParseError::UnknownMode('k'))
        );
        assert_eq!(parse_user_modes("+w"), Err(ModeParseError::UnknownMode('w')));
    }

    #[test]
    fn user_modes() {
        assert_eq!(
            parse_user_modes("-i").unwrap(),
            vec![UserModeChange::Invisible(false)]
        );
        assert_eq!(UserModeChange::Invisible(true).to_string(), "+i");
    }

    #[test]
    fn formatting_merges_signs() {
        let changes = vec![
            ChannelModeChange::Operator(true, "alice".into()),
            ChannelModeChange::Voice(true, "bob".into()),
            ChannelModeChange::Moderated(false),
        ];
        assert_eq!(format_channel_modes(&changes), vec!["+ov-m", "alice", "bob"]);
    }
}
