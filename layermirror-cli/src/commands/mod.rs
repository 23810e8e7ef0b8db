//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`ping`] - Reachability check against a remote tool
//! - [`run`] - Main command (start the viewer)

pub mod common;
pub mod config;
pub mod ping;
pub mod run;
