//! CLI runner for common setup.
//!
//! Encapsulates config loading, logging initialization and runtime creation
//! shared by the command handlers.

use tokio::runtime::Runtime;
use tracing::info;

use layermirror::config::ConfigFile;
use layermirror::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load the config file and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging unless RUST_LOG is set
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let logging_guard = init_logging(&config.logging.file, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("LayerMirror v{}", layermirror::VERSION);
        info!("LayerMirror CLI: {} command", command);
    }

    /// Single-threaded runtime the viewer runs on.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))
    }
}
