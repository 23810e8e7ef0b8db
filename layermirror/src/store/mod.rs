//! On-disk persistence for mirrored layers.
//!
//! Every registered layer is written verbatim under a fixed output root using
//! a deterministic file name derived from its logical path:
//!
//! ```text
//! <output_root>/.<logical path>.usda      e.g. tmp_scene/./world/geo.usda
//! <output_root>/./root.usda               reserved root path "/"
//! ```
//!
//! The composed root document is written to [`LayerStore::root_location`],
//! which is the same transform applied to the reserved root path.

mod disk;
mod error;
mod path;

pub use disk::LayerStore;
pub use error::StoreError;
pub use path::{
    layer_file_name, layer_file_path, LAYER_FILE_EXTENSION, ROOT_LAYER_PATH, ROOT_SEGMENT,
};
