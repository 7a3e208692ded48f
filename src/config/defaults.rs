//! Default value functions for configuration.

pub fn default_true() -> bool {
    true
}

// =============================================================================
// Server identity
// =============================================================================

pub fn default_server_name() -> String {
    "tinyircd.local".to_string()
}

pub fn default_network_name() -> String {
    "TinyNet".to_string()
}

pub fn default_sid() -> String {
    "001".to_string()
}

pub fn default_description() -> String {
    "tinyircd chat server".to_string()
}

// =============================================================================
// Idle timeouts
// =============================================================================

pub fn default_ping_interval() -> u64 {
    90
}

pub fn default_ping_timeout() -> u64 {
    120
}

pub fn default_registration_timeout() -> u64 {
    60
}

// =============================================================================
// Logging
// =============================================================================

pub fn default_log_level() -> String {
    "info".to_string()
}
