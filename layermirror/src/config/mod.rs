//! Configuration file handling for `~/.layermirror/config.ini`.
//!
//! Settings structs live in [`settings`], constants in [`defaults`],
//! parsing in `parser` and serialization in `writer`. Every value is
//! optional in the file; missing keys fall back to the defaults.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, ControlChannelSettings, LoggingSettings, RenderSettings, StoreSettings,
};
