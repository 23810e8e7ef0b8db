//! Run command - start the viewer and mirror layers until interrupted.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::info;

use layermirror::viewer::{unless_cancelled, ZmqViewer};

use super::common::{viewer_config, ViewerArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
#[derive(Default)]
pub struct RunArgs {
    pub viewer: ViewerArgs,
    pub output: Option<PathBuf>,
    pub interval_ms: Option<u64>,
    pub debug: bool,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("run");

    let config = viewer_config(runner.config(), &args.viewer, args.output, args.interval_ms)?;

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_clone.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let runtime = runner.runtime()?;
    runtime.block_on(async {
        let Some(mut viewer) = unless_cancelled(&shutdown, ZmqViewer::start(&config)).await?
        else {
            return Ok(());
        };
        println!(
            "Mirroring {} into {} (Ctrl+C to stop)",
            config.control_address,
            config.output_dir.display()
        );
        viewer.run(shutdown).await
    })?;

    info!("Viewer stopped");
    Ok(())
}
