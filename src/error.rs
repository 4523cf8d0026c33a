//! Error types for appdex.

use crate::registry::SettingsPane;

/// Platform registry failures. These propagate to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("application query failed: {0}")]
    Query(String),

    #[error("lifecycle registration failed: {0}")]
    Registration(String),

    #[error("unknown listener handle")]
    UnknownListener,

    #[error("launch action failed: {0}")]
    Action(String),

    #[error("not supported by this registry: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Launch failures, distinguishable per the operation contract.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// The request carried no identifier. No platform call was made.
    #[error("no application identifier provided")]
    MissingIdentifier,

    #[error("failed to launch {identifier}: {reason}")]
    Failed { identifier: String, reason: String },
}

/// Settings screen pass-through failures.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not open {pane} settings: {reason}")]
    Open { pane: SettingsPane, reason: String },
}

/// Icon renderer internals. Collapsed to `None` at the component boundary,
/// never surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("draw failed: {0}")]
    Draw(String),

    #[error(transparent)]
    Encode(#[from] image::ImageError),
}
