//! Error types for the layer store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while persisting or deleting layer files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the directory that holds a layer file.
    #[error("Failed to create directory '{}': {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a layer file.
    #[error("Failed to write layer file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to delete a layer file (already absent, permission denied, ...).
    #[error("Failed to remove layer file '{}': {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
