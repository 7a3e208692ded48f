//! Stable user identifiers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one connected user. Never reused while the process runs and
/// independent of the user's current nickname.
pub type Uid = String;

/// Mints ids of the form SID (3 chars) + 6 base36 chars, e.g. `001AAAAAA`.
pub struct UidGenerator {
    sid: String,
    counter: AtomicU64,
}

impl UidGenerator {
    pub fn new(sid: String) -> Self {
        Self {
            sid,
            counter: AtomicU64::new(0),
        }
    }

    /// Generate the next unique UID.
    pub fn next(&self) -> Uid {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.sid, base36_encode_6(n))
    }
}

fn base36_encode_6(mut n: u64) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut result = [b'A'; 6];

    for slot in result.iter_mut().rev() {
        *slot = CHARS[(n % 36) as usize];
        n /= 36;
    }

    result.iter().map(|&b| b as char).collect()
}
