//! Error types for root document composition.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or saving the composed root document.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Failed to create the directory of the root document.
    #[error("Failed to create directory '{}': {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the root document.
    #[error("Failed to save root document '{}': {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The composition engine refused the edit.
    #[error("Composition rejected: {0}")]
    Rejected(String),
}
