//! LayerMirror CLI - Command-line interface
//!
//! Starts the passive viewer against a remote authoring tool, checks that a
//! remote tool is reachable, and manages the configuration file.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::common::ViewerArgs;
use commands::config::ConfigCommands;

#[derive(Parser)]
#[command(name = "layermirror")]
#[command(version = layermirror::VERSION)]
#[command(about = "Mirror the layers of a remote authoring tool to disk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the remote tool and mirror its layers until interrupted
    Run {
        #[command(flatten)]
        viewer: ViewerArgs,

        /// Directory layer files and the root document are written to
        #[arg(long)]
        output: Option<std::path::PathBuf>,

        /// Idle time in milliseconds between frames while layers are loaded
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Enable debug-level logging
        #[arg(long)]
        debug: bool,
    },

    /// Check that the remote tool answers on its control endpoint
    Ping {
        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            viewer,
            output,
            interval_ms,
            debug,
        } => commands::run::run(commands::run::RunArgs {
            viewer,
            output,
            interval_ms,
            debug,
        }),
        Commands::Ping { viewer } => commands::ping::run(viewer),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
