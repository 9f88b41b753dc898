//! Error definitions for the prompt components

use thiserror::Error;

/// Errors raised by the scheme swapper, the glyph repository and icon labels
///
/// Everything except [`PromptError::DuplicateSingleton`] means a label is
/// misconfigured and cannot render safely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// A required collaborator (text target, action bindings, repository) is unbound
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    /// No sprite with the composed key exists in the active glyph sheet
    #[error("Glyph '{key}' not found in sheet '{sheet}'")]
    GlyphNotFound { key: String, sheet: String },

    /// The label template lacks the placeholder for its bound action
    #[error("Template '{template}' has no placeholder '{placeholder}'")]
    TemplateMismatch {
        template: String,
        placeholder: String,
    },

    /// A second glyph repository was installed while one is live
    #[error("Duplicate singleton: {0}")]
    DuplicateSingleton(String),
}
