//! The reconciliation loop.

use bytes::Bytes;
use tracing::{debug, error, info, trace, warn};

use crate::compose::Composer;
use crate::network::{NetworkError, NotifyMessage, NotifySource, PollMode};
use crate::registry::{Layer, LayerRegistry};
use crate::store::{layer_file_name, LayerStore};

/// What one reconciliation cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Notifications that changed the registry.
    pub applied: usize,
    /// Well-formed notifications that had no effect (remove of an unknown
    /// path, layer that could not be saved).
    pub rejected: usize,
    /// Malformed or unknown notifications that were dropped.
    pub discarded: usize,
    /// Whether the root document was rebuilt.
    pub rebuilt: bool,
}

impl CycleReport {
    /// Total notifications consumed in the cycle.
    pub fn received(&self) -> usize {
        self.applied + self.rejected + self.discarded
    }
}

enum Dispatch {
    Applied,
    Rejected,
    Discarded,
}

/// Owns the notify endpoint, the registry, the layer store and the
/// composer, and drives them from a single task.
pub struct Reconciler<N, C> {
    notify: N,
    registry: LayerRegistry,
    store: LayerStore,
    composer: C,
}

impl<N: NotifySource, C: Composer> Reconciler<N, C> {
    /// Create a reconciler with an empty registry.
    pub fn new(notify: N, store: LayerStore, composer: C) -> Self {
        Self {
            notify,
            registry: LayerRegistry::new(),
            store,
            composer,
        }
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn composer(&self) -> &C {
        &self.composer
    }

    /// Address of the notify endpoint.
    pub fn notify_endpoint(&self) -> &str {
        self.notify.endpoint()
    }

    /// Run one reconciliation cycle.
    ///
    /// While the registry is empty the cycle waits for the first message;
    /// otherwise it only consumes messages that are already pending. After
    /// the drain the root document is rebuilt once if anything changed.
    ///
    /// Only a failure of the notify endpoint itself is returned as an error.
    pub async fn cycle(&mut self) -> Result<CycleReport, NetworkError> {
        let mut report = CycleReport::default();

        loop {
            let mode = if self.registry.is_empty() {
                PollMode::Wait
            } else {
                PollMode::Immediate
            };

            let Some(frames) = self.notify.receive(mode).await? else {
                break;
            };

            match self.dispatch(NotifyMessage::parse(frames)) {
                Dispatch::Applied => report.applied += 1,
                Dispatch::Rejected => report.rejected += 1,
                Dispatch::Discarded => report.discarded += 1,
            }
        }

        if self.registry.is_dirty() {
            report.rebuilt = self.rebuild();
        }

        if report.received() > 0 {
            debug!(
                applied = report.applied,
                rejected = report.rejected,
                discarded = report.discarded,
                rebuilt = report.rebuilt,
                "Reconciliation cycle finished"
            );
        }
        Ok(report)
    }

    fn dispatch(&mut self, message: NotifyMessage) -> Dispatch {
        match message {
            NotifyMessage::Layer { path, payload } => self.apply_layer(path, payload),
            NotifyMessage::LayerRemove { path } => self.apply_remove(&path),
            NotifyMessage::Malformed { command, parts } => {
                debug!(command = %command, parts, "Dropping malformed notification");
                Dispatch::Discarded
            }
            NotifyMessage::Unknown { command } => {
                trace!(command = %command, "Dropping unknown notification");
                Dispatch::Discarded
            }
        }
    }

    fn apply_layer(&mut self, path: String, payload: Bytes) -> Dispatch {
        let bytes = payload.len();
        let was_dirty = self.registry.is_dirty();
        let outcome = self
            .registry
            .upsert(&path, Layer::new(path.clone(), payload.clone()));
        info!(path = %path, kind = outcome.label(), bytes, "Layer received");

        if let Err(e) = self.store.save(&path, &payload) {
            error!(path = %path, error = %e, "Failed to save layer, reverting");
            self.registry.revert_upsert(&path, outcome, was_dirty);
            return Dispatch::Rejected;
        }

        Dispatch::Applied
    }

    fn apply_remove(&mut self, path: &str) -> Dispatch {
        if let Err(e) = self.registry.remove(path) {
            warn!(path, error = %e, "Failed to remove layer");
            return Dispatch::Rejected;
        }

        info!(path, "Layer removed");
        if let Err(e) = self.store.remove(path) {
            warn!(path, error = %e, "Failed to remove layer file");
        }
        Dispatch::Applied
    }

    /// Replace the composer's sublayer list with the registry snapshot and
    /// save the root document. The dirty flag is cleared only on success.
    fn rebuild(&mut self) -> bool {
        let sublayers: Vec<String> = self
            .registry
            .snapshot_paths()
            .iter()
            .map(|path| layer_file_name(path))
            .collect();

        let result = self
            .composer
            .replace_sublayers(&sublayers)
            .and_then(|()| self.composer.save());

        match result {
            Ok(()) => {
                self.registry.clear_dirty();
                info!(layers = sublayers.len(), "Root document rebuilt");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to rebuild root document");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::ComposeError;
    use std::collections::VecDeque;
    use std::fs;
    use tempfile::TempDir;

    /// Notify source fed from a fixed queue. Waiting on an empty queue is a
    /// test bug, so it panics instead of hanging.
    struct QueuedSource {
        queue: VecDeque<Vec<Bytes>>,
        waits: usize,
    }

    impl QueuedSource {
        fn new(messages: &[&[&'static str]]) -> Self {
            let queue = messages.iter().map(|frames| message(frames)).collect();
            Self { queue, waits: 0 }
        }
    }

    impl NotifySource for QueuedSource {
        fn endpoint(&self) -> &str {
            "inproc://test"
        }

        async fn receive(&mut self, mode: PollMode) -> Result<Option<Vec<Bytes>>, NetworkError> {
            if mode == PollMode::Wait {
                self.waits += 1;
                assert!(!self.queue.is_empty(), "cycle would block forever");
            }
            Ok(self.queue.pop_front())
        }
    }

    fn message(frames: &[&'static str]) -> Vec<Bytes> {
        frames.iter().map(|frame| Bytes::from_static(frame.as_bytes())).collect()
    }

    #[derive(Default)]
    struct RecordingComposer {
        rebuilds: Vec<Vec<String>>,
        saves: usize,
        fail: bool,
    }

    impl Composer for RecordingComposer {
        fn replace_sublayers(&mut self, sublayers: &[String]) -> Result<(), ComposeError> {
            if self.fail {
                return Err(ComposeError::Rejected("composition offline".to_string()));
            }
            self.rebuilds.push(sublayers.to_vec());
            Ok(())
        }

        fn save(&mut self) -> Result<(), ComposeError> {
            self.saves += 1;
            Ok(())
        }
    }

    fn reconciler(
        messages: &[&[&'static str]],
    ) -> (TempDir, Reconciler<QueuedSource, RecordingComposer>) {
        let temp_dir = TempDir::new().unwrap();
        let store = LayerStore::new(temp_dir.path().join("tmp_scene"));
        let reconciler = Reconciler::new(
            QueuedSource::new(messages),
            store,
            RecordingComposer::default(),
        );
        (temp_dir, reconciler)
    }

    #[tokio::test]
    async fn test_single_layer_is_saved_and_rebuilt() {
        let (_temp, mut reconciler) = reconciler(&[&["layer", "/a", "X"]]);

        let report = reconciler.cycle().await.unwrap();

        assert_eq!(report.applied, 1);
        assert!(report.rebuilt);
        assert_eq!(reconciler.registry().snapshot_paths(), vec!["/a"]);
        assert!(!reconciler.registry().is_dirty());
        assert_eq!(fs::read(reconciler.store().location("/a")).unwrap(), b"X");
        assert_eq!(reconciler.composer().rebuilds, vec![vec!["./a.usda".to_string()]]);
        assert_eq!(reconciler.composer().saves, 1);
    }

    #[tokio::test]
    async fn test_edit_replaces_payload() {
        let (_temp, mut reconciler) = reconciler(&[
            &["layer", "/a", "X"],
            &["layer", "/a", "Y"],
        ]);

        reconciler.cycle().await.unwrap();

        let registry = reconciler.registry();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("/a").unwrap().payload, Bytes::from_static(b"Y"));
        assert_eq!(fs::read(reconciler.store().location("/a")).unwrap(), b"Y");
    }

    #[tokio::test]
    async fn test_burst_rebuilds_once_in_arrival_order() {
        let (_temp, mut reconciler) = reconciler(&[
            &["layer", "/c", "1"],
            &["layer", "/a", "2"],
            &["layer", "/b", "3"],
            &["layer", "/a", "4"],
        ]);

        let report = reconciler.cycle().await.unwrap();

        assert_eq!(report.applied, 4);
        assert_eq!(reconciler.composer().rebuilds.len(), 1);
        assert_eq!(
            reconciler.composer().rebuilds[0],
            vec!["./c.usda", "./a.usda", "./b.usda"]
        );
    }

    #[tokio::test]
    async fn test_malformed_layer_is_dropped() {
        let (_temp, mut reconciler) = reconciler(&[
            &["layer", "/a", "X"],
            &["layer", "/bad"],
            &["layer", "/b", "Y"],
        ]);

        let report = reconciler.cycle().await.unwrap();

        assert_eq!(report.applied, 2);
        assert_eq!(report.discarded, 1);
        assert_eq!(
            reconciler.composer().rebuilds,
            vec![vec!["./a.usda".to_string(), "./b.usda".to_string()]]
        );
        assert!(!reconciler.store().location("/bad").exists());
    }

    #[tokio::test]
    async fn test_unknown_command_is_dropped() {
        let (_temp, mut reconciler) = reconciler(&[
            &["layer", "/a", "X"],
            &["shutdown"],
        ]);

        let report = reconciler.cycle().await.unwrap();

        assert_eq!(report.discarded, 1);
        assert_eq!(reconciler.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_deletes_entry_and_file() {
        let (_temp, mut reconciler) = reconciler(&[
            &["layer", "/a", "X"],
            &["layer", "/b", "Y"],
        ]);
        reconciler.cycle().await.unwrap();
        reconciler
            .notify
            .queue
            .push_back(message(&["layerRemove", "/a"]));

        let report = reconciler.cycle().await.unwrap();

        assert_eq!(report.applied, 1);
        assert!(report.rebuilt);
        assert_eq!(reconciler.registry().snapshot_paths(), vec!["/b"]);
        assert!(!reconciler.store().location("/a").exists());
        assert_eq!(
            reconciler.composer().rebuilds.last().unwrap(),
            &vec!["./b.usda".to_string()]
        );
    }

    #[tokio::test]
    async fn test_remove_of_absent_path_changes_nothing() {
        let (_temp, mut reconciler) = reconciler(&[
            &["layer", "/a", "X"],
        ]);
        reconciler.cycle().await.unwrap();
        reconciler
            .notify
            .queue
            .push_back(message(&["layerRemove", "/missing"]));

        let report = reconciler.cycle().await.unwrap();

        assert_eq!(report.rejected, 1);
        assert!(!report.rebuilt);
        assert!(!reconciler.registry().is_dirty());
        assert_eq!(reconciler.composer().rebuilds.len(), 1);
    }

    #[tokio::test]
    async fn test_idle_cycle_with_layers_does_not_block_or_rebuild() {
        let (_temp, mut reconciler) = reconciler(&[&["layer", "/a", "X"]]);
        reconciler.cycle().await.unwrap();
        let waits = reconciler.notify.waits;

        let report = reconciler.cycle().await.unwrap();

        assert_eq!(report, CycleReport::default());
        assert_eq!(reconciler.notify.waits, waits);
        assert_eq!(reconciler.composer().rebuilds.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_registry_waits_for_first_message() {
        let (_temp, mut reconciler) = reconciler(&[&["layer", "/a", "X"]]);

        reconciler.cycle().await.unwrap();

        assert_eq!(reconciler.notify.waits, 1);
    }

    #[tokio::test]
    async fn test_failed_rebuild_keeps_dirty_and_retries() {
        let (_temp, mut reconciler) = reconciler(&[&["layer", "/a", "X"]]);
        reconciler.composer.fail = true;

        let report = reconciler.cycle().await.unwrap();
        assert!(!report.rebuilt);
        assert!(reconciler.registry().is_dirty());

        reconciler.composer.fail = false;
        let report = reconciler.cycle().await.unwrap();
        assert!(report.rebuilt);
        assert!(!reconciler.registry().is_dirty());
        assert_eq!(reconciler.composer().rebuilds, vec![vec!["./a.usda".to_string()]]);
    }

    #[tokio::test]
    async fn test_failed_save_reverts_registry() {
        let (temp, mut reconciler) = reconciler(&[
            &["layer", "/a", "X"],
            &["layer", "/blocked/child", "Y"],
        ]);
        // A plain file where the layer directory should go makes the save fail.
        let output_root = temp.path().join("tmp_scene");
        fs::create_dir_all(&output_root).unwrap();
        fs::write(output_root.join("blocked"), b"").unwrap();

        let report = reconciler.cycle().await.unwrap();

        assert_eq!(report.applied, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(reconciler.registry().snapshot_paths(), vec!["/a"]);
        assert_eq!(reconciler.composer().rebuilds, vec![vec!["./a.usda".to_string()]]);
    }

    #[tokio::test]
    async fn test_failed_save_of_new_layer_leaves_registry_clean() {
        let (temp, mut reconciler) = reconciler(&[&["layer", "/a", "X"]]);
        let output_root = temp.path().join("tmp_scene");
        fs::create_dir_all(&output_root).unwrap();
        fs::write(output_root.join("blocked"), b"").unwrap();

        reconciler.cycle().await.unwrap();
        assert!(!reconciler.registry().is_dirty());

        // The only message of the next cycle fails to save: nothing changed,
        // so nothing is rebuilt.
        reconciler.notify.queue.push_back(message(&["layer", "/blocked/child", "Y"]));
        let report = reconciler.cycle().await.unwrap();

        assert_eq!(report.rejected, 1);
        assert!(!report.rebuilt);
        assert!(!reconciler.registry().is_dirty());
        assert_eq!(reconciler.registry().snapshot_paths(), vec!["/a"]);
        assert_eq!(reconciler.composer().rebuilds.len(), 1);
    }
}
