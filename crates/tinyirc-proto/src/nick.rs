//! Nickname syntax.

/// Default maximum nickname length.
pub const DEFAULT_NICK_MAX_LEN: usize = 9;

#[inline]
fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}')
}

/// Check `nick` against the nickname grammar.
///
/// The first character is a letter or one of ``[]\`_^{|}``; the rest may
/// also be digits or `-`. Length is bounded by `max_len` bytes.
pub fn is_valid_nick(nick: &str, max_len: usize) -> bool {
    if nick.is_empty() || nick.len() > max_len {
        return false;
    }

    let mut chars = nick.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && !is_special(first) {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || is_special(c) || c == '-')
}
