//! Viewer error types.

use std::fmt;

use crate::compose::ComposeError;
use crate::network::NetworkError;
use crate::store::StoreError;

/// Errors that stop the viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// The layer store output directory could not be prepared
    Store(StoreError),
    /// The root document could not be created
    Compose(ComposeError),
    /// The control or notify channel failed
    Network(NetworkError),
}

impl ViewerError {
    /// Whether the remote tool is unreachable or refused the viewer.
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_fatal())
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Layer store error: {}", e),
            Self::Compose(e) => write!(f, "Composition error: {}", e),
            Self::Network(e) => write!(f, "Network error: {}", e),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Compose(e) => Some(e),
            Self::Network(e) => Some(e),
        }
    }
}

impl From<StoreError> for ViewerError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<ComposeError> for ViewerError {
    fn from(e: ComposeError) -> Self {
        Self::Compose(e)
    }
}

impl From<NetworkError> for ViewerError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}
