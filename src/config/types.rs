//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;
use super::limits::LimitsConfig;
use super::listen::ListenConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server identity and handshake behaviour.
    #[serde(default)]
    pub server: ServerConfig,
    /// Listener address.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Line, nickname and queue limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Keepalive and registration timeouts.
    #[serde(default)]
    pub timeouts: IdleTimeoutsConfig,
    /// Channel lifecycle options.
    #[serde(default)]
    pub channels: ChannelsConfig,
    /// Log filter and output format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name used as the prefix of numeric replies.
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Network name shown in the welcome line.
    #[serde(default = "default_network_name")]
    pub network: String,
    /// Three character server id, prefixed to every user id.
    #[serde(default = "default_sid")]
    pub sid: String,
    /// Server description (WHOIS 312).
    #[serde(default = "default_description")]
    pub description: String,
    /// Complete registration on NICK alone instead of waiting for USER.
    #[serde(default)]
    pub simple_handshake: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            network: default_network_name(),
            sid: default_sid(),
            description: default_description(),
            simple_handshake: false,
        }
    }
}

/// Keepalive timers, in seconds.
///
/// - `ping`: client silence before the server sends PING (default: 90)
/// - `timeout`: further silence after that PING before disconnect (default: 120)
/// - `registration`: time allowed to finish NICK/USER (default: 60)
#[derive(Debug, Clone, Deserialize)]
pub struct IdleTimeoutsConfig {
    #[serde(default = "default_ping_interval")]
    pub ping: u64,
    #[serde(default = "default_ping_timeout")]
    pub timeout: u64,
    #[serde(default = "default_registration_timeout")]
    pub registration: u64,
}

impl Default for IdleTimeoutsConfig {
    fn default() -> Self {
        Self {
            ping: default_ping_interval(),
            timeout: default_ping_timeout(),
            registration: default_registration_timeout(),
        }
    }
}

impl IdleTimeoutsConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn registration_timeout(&self) -> Duration {
        Duration::from_secs(self.registration)
    }
}

/// Channel lifecycle options.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelsConfig {
    /// Destroy a channel when its last member leaves (default: true).
    /// When false the channel keeps its topic and modes with zero members,
    /// and the next joiner becomes its operator.
    #[serde(default = "default_true")]
    pub prune_empty: bool,
    /// New channels start with +t (default: false).
    #[serde(default)]
    pub topic_lock_on_create: bool,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            prune_empty: true,
            topic_lock_on_create: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}
