//! Viewer startup and lifetime.
//!
//! Startup order:
//!
//! 1. Prepare the output directory and write an empty root document.
//! 2. Bind the notify endpoint.
//! 3. Connect the control channel and hand the notify address to the
//!    remote tool.
//! 4. Ask the remote tool to replay its stage as notifications.
//!
//! Any failure during startup is fatal. Once started, the viewer runs the
//! render loop until cancelled and then tells the remote tool it is leaving.

mod error;

pub use error::ViewerError;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::compose::{Composer, UsdaComposer};
use crate::network::zmq::{ZmqControlConnector, ZmqNotifySource};
use crate::network::{
    ControlClient, ControlConnector, ControlSettings, NotifySource, DEFAULT_NOTIFY_BIND,
};
use crate::store::LayerStore;
use crate::sync::{
    FrameRenderer, LogRenderer, Reconciler, RenderDriver, DEFAULT_RENDER_INTERVAL_MS,
};

/// Default output directory for layer files and the root document.
pub const DEFAULT_OUTPUT_DIR: &str = "tmp_scene";

/// Everything needed to start a viewer.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Remote tool control endpoint, e.g. `tcp://127.0.0.1:5560`.
    pub control_address: String,
    /// Local address for the notify endpoint.
    pub notify_bind: String,
    /// Directory layer files and the root document are written to.
    pub output_dir: PathBuf,
    pub control: ControlSettings,
    /// Idle time between frames while layers are present.
    pub render_interval: Duration,
}

impl ViewerConfig {
    /// Configuration with defaults for everything but the control address.
    pub fn new(control_address: impl Into<String>) -> Self {
        Self {
            control_address: control_address.into(),
            notify_bind: DEFAULT_NOTIFY_BIND.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            control: ControlSettings::default(),
            render_interval: Duration::from_millis(DEFAULT_RENDER_INTERVAL_MS),
        }
    }
}

/// Drive `startup` to completion unless `shutdown` is cancelled first.
///
/// Returns `Ok(None)` when cancelled. Startup can wait a long time (control
/// retries, an unanswered stage request), so callers that install their own
/// interrupt handler use this to stay interruptible.
pub async fn unless_cancelled<T>(
    shutdown: &CancellationToken,
    startup: impl Future<Output = Result<T, ViewerError>>,
) -> Result<Option<T>, ViewerError> {
    tokio::select! {
        _ = shutdown.cancelled() => {
            info!("Startup interrupted");
            Ok(None)
        }
        started = startup => started.map(Some),
    }
}

/// A started viewer: a handshaken control channel plus the render loop.
pub struct Viewer<K: ControlConnector, N, C, R> {
    control: ControlClient<K>,
    driver: RenderDriver<N, C, R>,
}

/// Viewer over ZeroMQ sockets writing USDA files.
pub type ZmqViewer = Viewer<ZmqControlConnector, ZmqNotifySource, UsdaComposer, LogRenderer>;

impl ZmqViewer {
    /// Start a viewer using ZeroMQ transports and the USDA root document.
    pub async fn start(config: &ViewerConfig) -> Result<Self, ViewerError> {
        let store = LayerStore::new(&config.output_dir);
        let composer = UsdaComposer::create(store.root_location())?;
        let notify = ZmqNotifySource::bind(&config.notify_bind).await?;

        Self::start_with(
            ZmqControlConnector,
            notify,
            store,
            composer,
            LogRenderer::new(),
            config,
        )
        .await
    }
}

impl<K, N, C, R> Viewer<K, N, C, R>
where
    K: ControlConnector,
    N: NotifySource,
    C: Composer,
    R: FrameRenderer,
{
    /// Handshake and request the stage using already constructed parts.
    pub async fn start_with(
        connector: K,
        notify: N,
        store: LayerStore,
        composer: C,
        renderer: R,
        config: &ViewerConfig,
    ) -> Result<Self, ViewerError> {
        let mut control =
            ControlClient::connect(connector, &config.control_address, config.control.clone())
                .await;

        control.handshake(notify.endpoint()).await?;
        control.request_stage().await?;

        info!(
            control = %config.control_address,
            notify = notify.endpoint(),
            output = %store.output_root().display(),
            "Viewer started"
        );

        let reconciler = Reconciler::new(notify, store, composer);
        let driver = RenderDriver::new(reconciler, renderer, config.render_interval);
        Ok(Self { control, driver })
    }

    pub fn control(&self) -> &ControlClient<K> {
        &self.control
    }

    pub fn driver(&self) -> &RenderDriver<N, C, R> {
        &self.driver
    }

    /// Run the render loop until `shutdown` is cancelled.
    ///
    /// On a clean stop the remote tool is sent `disconnect`; a failed
    /// disconnect is only logged.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<(), ViewerError> {
        self.driver.run(shutdown).await?;

        if let Err(e) = self.control.disconnect().await {
            warn!(error = %e, "Disconnect not acknowledged");
        }
        Ok(())
    }
}
