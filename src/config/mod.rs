//! Configuration loading and management.
//!
//! - [`types`]: top-level `Config`, server identity, timeouts, channels, logging
//! - [`listen`]: listener address
//! - [`limits`]: protocol and queue limits
//! - [`validation`]: start-up sanity checks

mod defaults;
mod limits;
mod listen;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::{
    ChannelsConfig, Config, ConfigError, IdleTimeoutsConfig, LogFormat, LoggingConfig,
    ServerConfig,
};
pub use validation::{validate, ValidationError};
