//! LayerMirror - passive viewer that mirrors a remote authoring tool's layers
//!
//! The remote tool pushes layer updates over a notify channel. The viewer
//! keeps a registry of the layers, writes each one to disk and rebuilds a
//! root document referencing all of them, once per batch of updates.
//!
//! # High-Level API
//!
//! ```ignore
//! use layermirror::viewer::{ViewerConfig, ZmqViewer};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ViewerConfig::new("tcp://127.0.0.1:5560");
//! let mut viewer = ZmqViewer::start(&config).await?;
//! viewer.run(CancellationToken::new()).await?;
//! ```

pub mod compose;
pub mod config;
pub mod logging;
pub mod network;
pub mod registry;
pub mod store;
pub mod sync;
pub mod viewer;

/// Version of the LayerMirror library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
