//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Minimum line length that still fits a useful command.
const MIN_LINE_LENGTH: usize = 64;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.name must not contain spaces")]
    ServerNameHasSpace,
    #[error("server.network is required")]
    MissingNetworkName,
    #[error("server.sid must be exactly 3 characters, got {0}")]
    InvalidSid(usize),
    #[error("server.sid must match pattern [0-9][A-Z0-9][A-Z0-9], got '{0}'")]
    InvalidSidFormat(String),
    #[error("limits.max_line_length must be at least 64, got {0}")]
    LineLengthTooSmall(usize),
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    } else if config.server.name.contains(' ') {
        errors.push(ValidationError::ServerNameHasSpace);
    }
    if config.server.network.is_empty() {
        errors.push(ValidationError::MissingNetworkName);
    }

    let sid = &config.server.sid;
    if sid.len() != 3 {
        errors.push(ValidationError::InvalidSid(sid.len()));
    } else {
        let bytes = sid.as_bytes();
        let valid = bytes[0].is_ascii_digit()
            && (bytes[1].is_ascii_uppercase() || bytes[1].is_ascii_digit())
            && (bytes[2].is_ascii_uppercase() || bytes[2].is_ascii_digit());
        if !valid {
            errors.push(ValidationError::InvalidSidFormat(sid.clone()));
        }
    }

    let limits = &config.limits;
    if limits.max_line_length < MIN_LINE_LENGTH {
        errors.push(ValidationError::LineLengthTooSmall(limits.max_line_length));
    }
    for (name, value) in [
        ("max_nick_length", limits.max_nick_length),
        ("sendq", limits.sendq),
        ("channel_mailbox_capacity", limits.channel_mailbox_capacity),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
