//! File system backed layer store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::StoreError;
use super::path::{layer_file_path, ROOT_LAYER_PATH};

/// Writes raw layer bytes to canonical locations under an output root.
///
/// No atomicity is provided beyond a plain overwrite. The output root is
/// assumed to be owned by this process while it runs.
#[derive(Debug, Clone)]
pub struct LayerStore {
    output_root: PathBuf,
}

impl LayerStore {
    /// Create a store rooted at `output_root`.
    ///
    /// The directory is created lazily by the first write.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Root directory of all persisted layers.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Canonical file location of a logical layer path.
    pub fn location(&self, layer_path: &str) -> PathBuf {
        layer_file_path(&self.output_root, layer_path)
    }

    /// Location of the composed root document.
    pub fn root_location(&self) -> PathBuf {
        self.location(ROOT_LAYER_PATH)
    }

    /// Persist `payload` for `layer_path`, overwriting any previous file.
    ///
    /// Intermediate directories are created as needed.
    pub fn save(&self, layer_path: &str, payload: &[u8]) -> Result<PathBuf, StoreError> {
        let location = self.location(layer_path);

        if let Some(parent) = location.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&location, payload).map_err(|source| StoreError::Write {
            path: location.clone(),
            source,
        })?;

        debug!(
            path = layer_path,
            file = %location.display(),
            bytes = payload.len(),
            "Layer saved"
        );
        Ok(location)
    }

    /// Delete the backing file of `layer_path`.
    ///
    /// Callers treat the error as recoverable: it is reported, never fatal.
    pub fn remove(&self, layer_path: &str) -> Result<(), StoreError> {
        let location = self.location(layer_path);
        fs::remove_file(&location).map_err(|source| StoreError::Remove {
            path: location.clone(),
            source,
        })?;

        debug!(path = layer_path, file = %location.display(), "Layer file removed");
        Ok(())
    }
}
