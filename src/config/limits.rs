//! Protocol and queue limits.

use serde::Deserialize;

/// Size limits applied to every connection.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Longest accepted input line in bytes, terminator included (default: 512).
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Longest accepted nickname (default: 9).
    #[serde(default = "default_max_nick_length")]
    pub max_nick_length: usize,
    /// Outbound queue depth per client, in lines (default: 256).
    /// A client whose queue fills up is disconnected with "SendQ exceeded".
    #[serde(default = "default_sendq")]
    pub sendq: usize,
    /// Channel actor mailbox capacity (default: 500).
    #[serde(default = "default_channel_mailbox_capacity")]
    pub channel_mailbox_capacity: usize,
    /// Maximum channels returned by LIST (default: 1000).
    #[serde(default = "default_max_list_channels")]
    pub max_list_channels: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            max_nick_length: default_max_nick_length(),
            sendq: default_sendq(),
            channel_mailbox_capacity: default_channel_mailbox_capacity(),
            max_list_channels: default_max_list_channels(),
        }
    }
}

fn default_max_line_length() -> usize {
    tinyirc_proto::line::DEFAULT_MAX_LINE_LEN
}

fn default_max_nick_length() -> usize {
    tinyirc_proto::DEFAULT_NICK_MAX_LEN
}

fn default_sendq() -> usize {
    256
}

fn default_channel_mailbox_capacity() -> usize {
    500
}

fn default_max_list_channels() -> usize {
    1000
}
