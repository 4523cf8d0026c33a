//! XDG directory resolution.

use std::path::PathBuf;

/// Directories holding `.desktop` files, in precedence order.
pub fn application_directories() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(data_home) = data_home() {
        dirs.push(data_home.join("applications"));
    }

    for data_dir in data_dirs() {
        dirs.push(data_dir.join("applications"));
    }

    // App formats (flatpak, snap)
    dirs.push(PathBuf::from("/var/lib/flatpak/exports/share/applications"));
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".local/share/flatpak/exports/share/applications"));
    }
    dirs.push(PathBuf::from("/var/lib/snapd/desktop/applications"));

    dirs
}

/// Base directories holding icon files, in precedence order.
pub fn icon_directories() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(data_home) = data_home() {
        dirs.push(data_home.join("icons"));
    }
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".icons"));
    }

    for data_dir in data_dirs() {
        dirs.push(data_dir.join("icons"));
        dirs.push(data_dir.join("pixmaps"));
    }

    dirs.push(PathBuf::from("/usr/share/pixmaps"));
    dirs.push(PathBuf::from("/var/lib/flatpak/exports/share/icons"));
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".local/share/flatpak/exports/share/icons"));
    }
    dirs.push(PathBuf::from("/var/lib/snapd/desktop/icons"));

    dirs
}

/// Default backend config file location.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("appdex").join("config.json"))
}

fn data_home() -> Option<PathBuf> {
    std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
}

fn data_dirs() -> Vec<PathBuf> {
    let raw = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    raw.split(':')
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect()
}
