//! Default values for every configuration setting.

use std::path::PathBuf;

use super::settings::*;

pub use crate::network::{DEFAULT_HANDSHAKE_TIMEOUT_MS, DEFAULT_MAX_RETRIES};
pub use crate::sync::DEFAULT_RENDER_INTERVAL_MS;
pub use crate::viewer::DEFAULT_OUTPUT_DIR;

/// Log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "layermirror.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            control: ControlChannelSettings {
                address: None,
                handshake_timeout_ms: DEFAULT_HANDSHAKE_TIMEOUT_MS,
                max_retries: DEFAULT_MAX_RETRIES,
            },
            store: StoreSettings {
                directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            },
            render: RenderSettings {
                interval_ms: DEFAULT_RENDER_INTERVAL_MS,
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
