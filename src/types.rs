//! Core data types and their wire shapes.

use serde::{Deserialize, Serialize};

/// One installed, launchable application.
///
/// Built fresh on every enumeration; there is no persisted identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    /// Human-readable label. Not guaranteed unique.
    pub name: String,
    /// Stable application identifier. Never empty in a returned catalog.
    pub package: String,
    /// Base64-encoded PNG, `None` when rendering failed for this entry.
    pub icon: Option<String>,
}

/// What a lifecycle broadcast did to the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Installed,
    Removed,
    Changed,
    Unknown,
}

/// Normalized catalog-change notification.
///
/// Forwarded to the current subscriber as soon as it is built, never
/// buffered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "event")]
    pub kind: ChangeKind,
    /// Affected application, when the platform event carried one.
    pub package: Option<String>,
}
