//! Option handling shared by the commands that talk to a remote tool.
//!
//! Command line values win over the config file, which wins over the
//! built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use layermirror::config::ConfigFile;
use layermirror::network::ControlSettings;
use layermirror::viewer::ViewerConfig;

use crate::error::CliError;

/// Control channel options.
#[derive(Debug, Clone, Default, Args)]
pub struct ViewerArgs {
    /// Control endpoint of the remote tool (e.g. tcp://127.0.0.1:5560)
    #[arg(long)]
    pub control: Option<String>,

    /// Attempts per control request before giving up
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: Option<u32>,

    /// Reply timeout in milliseconds for the handshake
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,
}

/// Resolve the control endpoint address.
pub fn control_address(config: &ConfigFile, args: &ViewerArgs) -> Result<String, CliError> {
    args.control
        .clone()
        .or_else(|| config.control.address.clone())
        .ok_or(CliError::MissingControlAddress)
}

/// Resolve control channel retry and timeout settings.
pub fn control_settings(config: &ConfigFile, args: &ViewerArgs) -> ControlSettings {
    ControlSettings::from_config(
        args.timeout_ms.unwrap_or(config.control.handshake_timeout_ms),
        args.retries.unwrap_or(config.control.max_retries),
    )
}

/// Build the full viewer configuration.
pub fn viewer_config(
    config: &ConfigFile,
    args: &ViewerArgs,
    output: Option<PathBuf>,
    interval_ms: Option<u64>,
) -> Result<ViewerConfig, CliError> {
    let mut viewer = ViewerConfig::new(control_address(config, args)?);
    viewer.control = control_settings(config, args);
    viewer.output_dir = output.unwrap_or_else(|| config.store.directory.clone());
    viewer.render_interval =
        Duration::from_millis(interval_ms.unwrap_or(config.render.interval_ms));
    Ok(viewer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_address_is_an_error() {
        let result = control_address(&ConfigFile::default(), &ViewerArgs::default());
        assert!(matches!(result, Err(CliError::MissingControlAddress)));
    }

    #[test]
    fn test_command_line_wins_over_config_file() {
        let mut config = ConfigFile::default();
        config.control.address = Some("tcp://from-file:1".to_string());
        config.control.max_retries = 5;
        let args = ViewerArgs {
            control: Some("tcp://from-cli:2".to_string()),
            retries: None,
            timeout_ms: Some(100),
        };

        let viewer = viewer_config(&config, &args, None, None).unwrap();

        assert_eq!(viewer.control_address, "tcp://from-cli:2");
        assert_eq!(viewer.control.max_retries, 5);
        assert_eq!(viewer.control.handshake_timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_config_file_fills_remaining_values() {
        let mut config = ConfigFile::default();
        config.control.address = Some("tcp://from-file:1".to_string());
        config.store.directory = PathBuf::from("/srv/scene");
        config.render.interval_ms = 40;

        let viewer = viewer_config(&config, &ViewerArgs::default(), None, Some(10)).unwrap();

        assert_eq!(viewer.control_address, "tcp://from-file:1");
        assert_eq!(viewer.output_dir, PathBuf::from("/srv/scene"));
        assert_eq!(viewer.render_interval, Duration::from_millis(10));
    }
}
