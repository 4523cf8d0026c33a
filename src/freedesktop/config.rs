//! Backend configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tunables for [`FreedesktopRegistry`](super::FreedesktopRegistry).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directories scanned for `.desktop` files. Empty means the XDG
    /// default set.
    pub application_dirs: Vec<PathBuf>,
    /// Directories scanned for icon files. Empty means the XDG default set.
    pub icon_dirs: Vec<PathBuf>,
    /// Locale for `Name[...]` lookup, e.g. `de_DE`. `None` means take it
    /// from the environment.
    pub locale: Option<String>,
    /// Command spawned by the home-settings pass-through.
    pub home_settings_command: Vec<String>,
    /// Command spawned by the system-settings pass-through.
    pub system_settings_command: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            application_dirs: Vec::new(),
            icon_dirs: Vec::new(),
            locale: None,
            home_settings_command: vec![
                "gnome-control-center".to_string(),
                "appearance".to_string(),
            ],
            system_settings_command: vec!["gnome-control-center".to_string()],
        }
    }
}

impl RegistryConfig {
    /// Load from a JSON config file, falling back to defaults when the file
    /// is missing or malformed.
    pub fn load(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }
}
