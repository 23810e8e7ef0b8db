//! Configuration for the control channel.

use std::time::Duration;

/// Reply timeout for the handshake (and other short control requests).
pub const DEFAULT_HANDSHAKE_TIMEOUT_MS: u64 = 2500;

/// Attempts per control request before the remote tool is considered offline.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Local address the notify endpoint binds to. Port 0 picks an ephemeral port.
pub const DEFAULT_NOTIFY_BIND: &str = "tcp://127.0.0.1:0";

/// Retry and timeout settings for the control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSettings {
    /// How long to wait for a handshake, ping or disconnect reply.
    pub handshake_timeout: Duration,

    /// Attempts per request, each on a fresh connection.
    pub max_retries: u32,
}

impl ControlSettings {
    /// Create settings from raw config values.
    pub fn from_config(handshake_timeout_ms: u64, max_retries: u32) -> Self {
        Self {
            handshake_timeout: Duration::from_millis(handshake_timeout_ms),
            max_retries,
        }
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self::from_config(DEFAULT_HANDSHAKE_TIMEOUT_MS, DEFAULT_MAX_RETRIES)
    }
}
