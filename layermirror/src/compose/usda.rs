//! Plain-text USD root document writer.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::ComposeError;
use super::Composer;

const USDA_HEADER: &str = "#usda 1.0";

/// Writes a `#usda 1.0` root document whose only content is the sublayer
/// list.
///
/// ```text
/// #usda 1.0
/// (
///     subLayers = [
///         @./a.usda@,
///         @./b.usda@
///     ]
/// )
/// ```
#[derive(Debug)]
pub struct UsdaComposer {
    location: PathBuf,
    sublayers: Vec<String>,
}

impl UsdaComposer {
    /// Create a new root document at `location`, replacing any existing one.
    ///
    /// The document starts with no sublayers and is written immediately so
    /// that it exists before the first layer arrives.
    pub fn create(location: impl Into<PathBuf>) -> Result<Self, ComposeError> {
        let mut composer = Self {
            location: location.into(),
            sublayers: Vec::new(),
        };
        composer.save()?;
        Ok(composer)
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Sublayer references of the last committed edit.
    pub fn sublayers(&self) -> &[String] {
        &self.sublayers
    }

    /// Render the document text for the committed sublayers.
    pub fn render(&self) -> String {
        if self.sublayers.is_empty() {
            return format!("{}\n", USDA_HEADER);
        }

        let entries = self
            .sublayers
            .iter()
            .map(|sublayer| format!("        @{}@", sublayer))
            .collect::<Vec<_>>()
            .join(",\n");

        format!(
            "{}\n(\n    subLayers = [\n{}\n    ]\n)\n",
            USDA_HEADER, entries
        )
    }
}

impl Composer for UsdaComposer {
    fn replace_sublayers(&mut self, sublayers: &[String]) -> Result<(), ComposeError> {
        self.sublayers = sublayers.to_vec();
        Ok(())
    }

    fn save(&mut self) -> Result<(), ComposeError> {
        if let Some(parent) = self.location.parent() {
            fs::create_dir_all(parent).map_err(|source| ComposeError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.location, self.render()).map_err(|source| ComposeError::Save {
            path: self.location.clone(),
            source,
        })?;

        debug!(
            file = %self.location.display(),
            sublayers = self.sublayers.len(),
            "Root document saved"
        );
        Ok(())
    }
}
