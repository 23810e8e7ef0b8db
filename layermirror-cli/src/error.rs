//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use layermirror::config::ConfigFileError;
use layermirror::network::NetworkError;
use layermirror::viewer::ViewerError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// Neither the command line nor the config file names a control endpoint
    MissingControlAddress,
    /// Failed to build the async runtime
    Runtime(String),
    /// The viewer failed to start or stopped with an error
    Viewer(ViewerError),
    /// The remote tool did not answer a ping
    Ping(NetworkError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::MissingControlAddress => {
                eprintln!();
                eprintln!("Pass the remote tool's control endpoint, for example:");
                eprintln!("  layermirror run --control tcp://127.0.0.1:5560");
                eprintln!("or set [control] address in the config file (layermirror config path).");
            }
            CliError::Viewer(e) if e.is_remote_failure() => {
                eprintln!();
                eprintln!("Make sure the remote tool is running and its control endpoint");
                eprintln!("is reachable at the configured address.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::MissingControlAddress => write!(f, "No control endpoint configured"),
            CliError::Runtime(msg) => write!(f, "Failed to start runtime: {}", msg),
            CliError::Viewer(e) => write!(f, "Viewer failed: {}", e),
            CliError::Ping(e) => write!(f, "Ping failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Viewer(e) => Some(e),
            CliError::Ping(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ViewerError> for CliError {
    fn from(e: ViewerError) -> Self {
        CliError::Viewer(e)
    }
}
