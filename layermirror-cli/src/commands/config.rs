//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init`.

use clap::Subcommand;
use layermirror::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init { force } => run_init(force),
    }
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// Print the loaded configuration, defaults included.
fn run_show() -> Result<(), CliError> {
    let path = config_file_path();
    let config = ConfigFile::load_from(&path)?;

    if path.exists() {
        println!("; Loaded from {}", path.display());
    } else {
        println!("; {} not found, showing defaults", path.display());
    }
    print!("{}", config.to_config_string());
    Ok(())
}

/// Write the default configuration file.
fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() && !force {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
