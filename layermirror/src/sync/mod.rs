//! Reconciliation of pushed layer updates into the composed root document.
//!
//! One [`Reconciler::cycle`] drains every pending notification, applies it
//! to the registry and the layer store, and then rebuilds the root document
//! at most once. A burst of N notifications therefore costs one rebuild.
//! [`RenderDriver`] repeats cycles and renders between them.

mod driver;
mod reconcile;

pub use driver::{FrameRenderer, LogRenderer, RenderDriver, DEFAULT_RENDER_INTERVAL_MS};
pub use reconcile::{CycleReport, Reconciler};
