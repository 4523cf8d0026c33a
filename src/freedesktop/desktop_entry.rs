//! `.desktop` entry parsing.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One parsed desktop entry that passed the launcher criteria.
#[derive(Clone, Debug)]
pub struct DesktopEntry {
    /// Desktop-file id, e.g. `firefox.desktop`.
    pub id: String,
    /// Localized display name.
    pub name: String,
    /// Raw Exec line, field codes included.
    pub exec: String,
    pub icon_name: Option<String>,
}

/// Parse `path`, returning `None` unless it is a displayable application
/// with an exec line.
pub fn parse_desktop_file(path: &Path, locale: Option<&str>) -> Option<DesktopEntry> {
    let content = fs::read_to_string(path).ok()?;
    let entries = desktop_entry_group(&content);

    if entries.get("Type").map(String::as_str) != Some("Application") {
        return None;
    }
    if is_true(entries.get("NoDisplay")) || is_true(entries.get("Hidden")) {
        return None;
    }

    let exec = entries.get("Exec")?.clone();
    let name = localized_name(&entries, locale)?;
    let id = path.file_name()?.to_string_lossy().into_owned();

    Some(DesktopEntry {
        id,
        name,
        exec,
        icon_name: entries.get("Icon").cloned(),
    })
}

/// Strip freedesktop field codes (`%f`, `%U`, ...) from an Exec line.
pub fn strip_field_codes(exec: &str) -> String {
    exec.split_whitespace()
        .filter(|token| !(token.len() == 2 && token.starts_with('%')))
        .collect::<Vec<_>>()
        .join(" ")
}

fn desktop_entry_group(content: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            in_desktop_entry = line == "[Desktop Entry]";
            continue;
        }

        if in_desktop_entry {
            if let Some((key, value)) = line.split_once('=') {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    entries
}

/// `Name[ll_CC]`, then `Name[ll]`, then `Name`. The locale may carry an
/// encoding suffix (`de_DE.UTF-8`), which is ignored.
fn localized_name(entries: &HashMap<String, String>, locale: Option<&str>) -> Option<String> {
    if let Some(locale) = locale {
        let full = locale.split('.').next().unwrap_or(locale);
        if let Some(name) = entries.get(&format!("Name[{full}]")) {
            return Some(name.clone());
        }
        if let Some(lang) = full.split('_').next() {
            if lang != full {
                if let Some(name) = entries.get(&format!("Name[{lang}]")) {
                    return Some(name.clone());
                }
            }
        }
    }
    entries.get("Name").cloned()
}

fn is_true(value: Option<&String>) -> bool {
    value.map(String::as_str) == Some("true")
}
