//! Ping command - check that a remote tool answers on its control endpoint.

use layermirror::network::zmq::ZmqControlConnector;
use layermirror::network::ControlClient;

use super::common::{control_address, control_settings, ViewerArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the ping command.
pub fn run(args: ViewerArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(false)?;
    runner.log_startup("ping");

    let address = control_address(runner.config(), &args)?;
    let settings = control_settings(runner.config(), &args);

    let runtime = runner.runtime()?;
    let round_trip = runtime.block_on(async {
        let mut client = ControlClient::connect(ZmqControlConnector, &address, settings).await;
        client.ping().await
    });
    let round_trip = round_trip.map_err(CliError::Ping)?;

    println!(
        "{} answered in {:.1} ms",
        address,
        round_trip.as_secs_f64() * 1000.0
    );
    Ok(())
}
