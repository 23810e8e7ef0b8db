//! Logical layer path to file name transform.

use std::path::{Path, PathBuf};

/// Logical path of the root layer.
pub const ROOT_LAYER_PATH: &str = "/";

/// Segment substituted for the root path when deriving a file name.
///
/// A remote layer whose logical path is literally `/root` derives the same
/// file name as the root path. That collision is not guarded against.
pub const ROOT_SEGMENT: &str = "/root";

/// Extension of every persisted layer file.
pub const LAYER_FILE_EXTENSION: &str = "usda";

/// Derive the relative file name for a logical layer path.
///
/// The name is dot-prefixed so that it resolves relative to the output root
/// and is the same string the composed root document uses to reference the
/// layer.
///
/// # Example
///
/// ```
/// use layermirror::store::layer_file_name;
///
/// assert_eq!(layer_file_name("/world/geo"), "./world/geo.usda");
/// assert_eq!(layer_file_name("/"), "./root.usda");
/// ```
pub fn layer_file_name(layer_path: &str) -> String {
    let layer_path = if layer_path == ROOT_LAYER_PATH {
        ROOT_SEGMENT
    } else {
        layer_path
    };
    format!(".{}.{}", layer_path, LAYER_FILE_EXTENSION)
}

/// Full on-disk location of a logical layer path under `output_root`.
///
/// # Example
///
/// ```
/// use std::path::{Path, PathBuf};
/// use layermirror::store::layer_file_path;
///
/// let path = layer_file_path(Path::new("tmp_scene"), "/a");
/// assert_eq!(path, PathBuf::from("tmp_scene/./a.usda"));
/// ```
pub fn layer_file_path(output_root: &Path, layer_path: &str) -> PathBuf {
    output_root.join(layer_file_name(layer_path))
}
