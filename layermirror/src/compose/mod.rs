//! Composition of the root document from the registered layers.
//!
//! The scene-composition engine is an external collaborator: the
//! reconciliation loop only hands it the ordered list of sublayer
//! references through the [`Composer`] trait. [`UsdaComposer`] is the
//! built-in implementation that writes a plain-text root document.

mod error;
mod usda;

pub use error::ComposeError;
pub use usda::UsdaComposer;

/// Builds and persists the composed root document.
pub trait Composer {
    /// Replace the whole sublayer list in one edit and commit it.
    ///
    /// `sublayers` are layer file references relative to the root document,
    /// in the order they must be declared.
    fn replace_sublayers(&mut self, sublayers: &[String]) -> Result<(), ComposeError>;

    /// Persist the committed root document.
    fn save(&mut self) -> Result<(), ComposeError>;
}
