//! Channel name syntax.

/// Maximum channel name length in bytes, prefix included.
pub const MAX_CHANNEL_NAME_LEN: usize = 50;

/// True if `name` is a syntactically valid channel name.
///
/// Channel names start with `#` or `&` and never contain space, comma,
/// BEL or any other control character.
pub fn is_channel_name(name: &str) -> bool {
    let mut chars = name.chars();
    if !matches!(chars.next(), Some('#' | '&')) {
        return false;
    }
    if name.len() > MAX_CHANNEL_NAME_LEN {
        return false;
    }
    chars.all(|c| c != ' ' && c != ',' && !c.is_control())
}

/// Prefix a bare name with `#`; names that already carry a prefix are
/// returned unchanged.
pub fn normalize_channel_name(name: &str) -> String {
    if name.starts_with(['#', '&']) {
        name.to_string()
    } else {
        format!("#{name}")
    }
}
