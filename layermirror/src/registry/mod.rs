//! In-memory registry of mirrored layers.
//!
//! The registry maps logical layer paths to their latest payload and tracks
//! whether anything changed since the composed root document was last
//! rebuilt. Iteration order is first-insertion order: replacing a layer keeps
//! its position, removing it and adding it again moves it to the end. That
//! order is the sublayer order of the composed document.

use bytes::Bytes;
use indexmap::IndexMap;
use thiserror::Error;

/// A mirrored layer: logical path plus the exact bytes received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub path: String,
    pub payload: Bytes,
}

impl Layer {
    pub fn new(path: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            payload: payload.into(),
        }
    }
}

/// Which case an upsert hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The path was not registered before.
    Inserted,
    /// The path was registered; carries the layer that was replaced.
    Replaced(Layer),
}

impl UpsertOutcome {
    /// Short label used in log events ("new" or "edit").
    pub fn label(&self) -> &'static str {
        match self {
            UpsertOutcome::Inserted => "new",
            UpsertOutcome::Replaced(_) => "edit",
        }
    }
}

/// Registry errors. None of them leave the registry modified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Remove of a path that is not registered.
    #[error("Layer \"{0}\" does not exist")]
    NotFound(String),
}

/// Insertion-ordered layer registry with dirty tracking.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    entries: IndexMap<String, Layer>,
    dirty: bool,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the layer registered under `path`.
    ///
    /// Always marks the registry dirty.
    pub fn upsert(&mut self, path: &str, layer: Layer) -> UpsertOutcome {
        self.dirty = true;
        match self.entries.insert(path.to_string(), layer) {
            Some(previous) => UpsertOutcome::Replaced(previous),
            None => UpsertOutcome::Inserted,
        }
    }

    /// Remove the layer registered under `path`.
    ///
    /// A missing path leaves both the entries and the dirty flag untouched.
    pub fn remove(&mut self, path: &str) -> Result<Layer, RegistryError> {
        let layer = self
            .entries
            .shift_remove(path)
            .ok_or_else(|| RegistryError::NotFound(path.to_string()))?;
        self.dirty = true;
        Ok(layer)
    }

    /// Undo the upsert of `path` that returned `outcome`.
    ///
    /// Entries, their order and the dirty flag go back to what they were
    /// before the upsert; `was_dirty` is the flag read just before it.
    pub fn revert_upsert(&mut self, path: &str, outcome: UpsertOutcome, was_dirty: bool) {
        match outcome {
            UpsertOutcome::Inserted => {
                self.entries.shift_remove(path);
            }
            UpsertOutcome::Replaced(previous) => {
                self.entries.insert(path.to_string(), previous);
            }
        }
        self.dirty = was_dirty;
    }

    pub fn get(&self, path: &str) -> Option<&Layer> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the entries changed since the last committed rebuild.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reset the dirty flag. Only call right after a rebuild committed.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Registered logical paths in registry order.
    pub fn snapshot_paths(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
