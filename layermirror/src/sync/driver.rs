//! Render loop around the reconciliation cycle.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::reconcile::{CycleReport, Reconciler};
use crate::compose::Composer;
use crate::network::{NetworkError, NotifySource};
use crate::registry::LayerRegistry;

/// Default pause between frames while layers are present.
pub const DEFAULT_RENDER_INTERVAL_MS: u64 = 1000;

/// Rendering work done between reconciliation cycles.
pub trait FrameRenderer {
    fn render(&mut self, registry: &LayerRegistry);
}

/// Renderer that only records frames in the log.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameRenderer for LogRenderer {
    fn render(&mut self, registry: &LayerRegistry) {
        self.frames += 1;
        debug!(frame = self.frames, layers = registry.len(), "Frame rendered");
    }
}

/// Repeats reconciliation cycles, rendering and idling while layers exist.
///
/// With no layers registered the next cycle starts immediately and blocks
/// inside the reconciler until the first notification arrives.
pub struct RenderDriver<N, C, R> {
    reconciler: Reconciler<N, C>,
    renderer: R,
    interval: Duration,
}

impl<N, C, R> RenderDriver<N, C, R>
where
    N: NotifySource,
    C: Composer,
    R: FrameRenderer,
{
    pub fn new(reconciler: Reconciler<N, C>, renderer: R, interval: Duration) -> Self {
        Self {
            reconciler,
            renderer,
            interval,
        }
    }

    pub fn reconciler(&self) -> &Reconciler<N, C> {
        &self.reconciler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// One reconciliation cycle followed by a frame when layers exist.
    pub async fn step(&mut self) -> Result<CycleReport, NetworkError> {
        let report = self.reconciler.cycle().await?;

        if !self.reconciler.registry().is_empty() {
            self.renderer.render(self.reconciler.registry());
            tokio::time::sleep(self.interval).await;
        }
        Ok(report)
    }

    /// Step until `shutdown` is cancelled or the notify endpoint fails.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<(), NetworkError> {
        info!(
            endpoint = self.reconciler.notify_endpoint(),
            interval_ms = self.interval.as_millis() as u64,
            "Render loop started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.step() => {
                    result?;
                }
            }
        }

        info!(
            layers = self.reconciler.registry().len(),
            "Render loop stopped"
        );
        Ok(())
    }
}
