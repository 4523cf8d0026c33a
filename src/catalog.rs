//! Catalog enumeration.

use crate::error::RegistryError;
use crate::icon;
use crate::registry::AppRegistry;
use crate::types::AppEntry;
use log::warn;

/// Query the full catalog of launchable applications, sorted by display
/// name.
///
/// A single entry's icon failure keeps the entry with `icon: None`; only a
/// platform-level query failure fails the whole call. Potentially expensive:
/// one icon render per entry.
pub fn list_apps(registry: &dyn AppRegistry) -> Result<Vec<AppEntry>, RegistryError> {
    let apps = registry.query_launchable_apps()?;

    let mut entries = Vec::with_capacity(apps.len());
    for app in apps {
        if app.identifier.is_empty() {
            warn!("skipping launchable app with empty identifier");
            continue;
        }
        let icon = app.icon.as_ref().and_then(icon::encode_icon);
        entries.push(AppEntry {
            name: app.label.unwrap_or_default(),
            package: app.identifier,
            icon,
        });
    }

    // Stable sort: equal names keep enumeration order.
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
