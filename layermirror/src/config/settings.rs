//! Settings structs for each configuration section.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;

/// Complete viewer configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Control channel settings
    pub control: ControlChannelSettings,
    /// Layer store settings
    pub store: StoreSettings,
    /// Render loop settings
    pub render: RenderSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// `[control]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlChannelSettings {
    /// Remote tool control endpoint. Usually given on the command line.
    pub address: Option<String>,
    /// Reply timeout for handshake, ping and disconnect, in milliseconds
    pub handshake_timeout_ms: u64,
    /// Attempts per control request
    pub max_retries: u32,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Output directory for layer files and the root document
    pub directory: PathBuf,
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Idle time between frames, in milliseconds
    pub interval_ms: u64,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
