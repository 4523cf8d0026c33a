//! Freedesktop (XDG) host backend.
//!
//! Implements [`AppRegistry`] over `.desktop` files, the icon directories
//! and filesystem watches: the ground truth a Linux launcher shell works
//! from. Every query rescans the directories; nothing is cached between
//! calls.

mod config;
mod desktop_entry;
mod icons;
mod paths;
mod watch;

pub use config::RegistryConfig;
pub use desktop_entry::DesktopEntry;

use crate::error::RegistryError;
use crate::registry::{
    AppRegistry, LaunchAction, LaunchableApp, LifecycleCallback, ListenerHandle, SettingsPane,
};
use icons::IconIndex;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use walkdir::WalkDir;
use watch::DirectoryWatch;

pub struct FreedesktopRegistry {
    config: RegistryConfig,
    application_dirs: Vec<PathBuf>,
    icon_index: IconIndex,
    locale: Option<String>,
    watches: Mutex<HashMap<u64, DirectoryWatch>>,
    next_handle: AtomicU64,
}

impl FreedesktopRegistry {
    /// Registry over the XDG default directories, configured from the
    /// user's config file when present.
    pub fn new() -> Self {
        let config = paths::config_path()
            .map(|path| RegistryConfig::load(&path))
            .unwrap_or_default();
        Self::with_config(config)
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let application_dirs = if config.application_dirs.is_empty() {
            paths::application_directories()
        } else {
            config.application_dirs.clone()
        };
        let icon_dirs = if config.icon_dirs.is_empty() {
            paths::icon_directories()
        } else {
            config.icon_dirs.clone()
        };
        let locale = config.locale.clone().or_else(detect_locale);

        info!(
            "freedesktop registry over {} application dirs",
            application_dirs.len()
        );
        let icon_index = IconIndex::build(&icon_dirs);

        Self {
            config,
            application_dirs,
            icon_index,
            locale,
            watches: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    /// Scan all application directories. The first entry per desktop-file id
    /// wins, matching XDG precedence.
    fn scan_entries(&self) -> Vec<DesktopEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for dir in &self.application_dirs {
            if !dir.exists() {
                continue;
            }

            let walker = WalkDir::new(dir).follow_links(true).max_depth(3);
            for file in walker.into_iter().filter_map(|e| e.ok()) {
                let path = file.path();
                if path.extension().and_then(|e| e.to_str()) != Some("desktop") {
                    continue;
                }
                if let Some(entry) =
                    desktop_entry::parse_desktop_file(path, self.locale.as_deref())
                {
                    if seen.insert(entry.id.clone()) {
                        entries.push(entry);
                    }
                }
            }
        }

        debug!("scanned {} desktop entries", entries.len());
        entries
    }

    fn spawn_command(command_line: &[String]) -> Result<(), RegistryError> {
        let (program, args) = command_line
            .split_first()
            .ok_or_else(|| RegistryError::Unsupported("no command configured".to_string()))?;
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

impl Default for FreedesktopRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AppRegistry for FreedesktopRegistry {
    fn query_launchable_apps(&self) -> Result<Vec<LaunchableApp>, RegistryError> {
        let apps = self
            .scan_entries()
            .into_iter()
            .map(|entry| {
                let icon = entry
                    .icon_name
                    .as_deref()
                    .and_then(|name| self.icon_index.resolve(name))
                    .and_then(|path| icons::load_icon(&path));
                LaunchableApp {
                    identifier: entry.id,
                    label: Some(entry.name),
                    icon,
                }
            })
            .collect();
        Ok(apps)
    }

    fn resolve_launch_action(&self, identifier: &str) -> Option<Box<dyn LaunchAction>> {
        let entry = self
            .scan_entries()
            .into_iter()
            .find(|entry| entry.id == identifier)?;
        Some(Box::new(ExecAction {
            identifier: entry.id,
            exec: entry.exec,
        }))
    }

    fn register_lifecycle_listener(
        &self,
        callback: LifecycleCallback,
    ) -> Result<ListenerHandle, RegistryError> {
        let watch = watch::spawn(&self.application_dirs, callback)
            .map_err(|err| RegistryError::Registration(err.to_string()))?;
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.watches.lock().unwrap().insert(id, watch);
        debug!("lifecycle listener {id} registered");
        Ok(ListenerHandle(id))
    }

    fn unregister_lifecycle_listener(&self, handle: ListenerHandle) -> Result<(), RegistryError> {
        match self.watches.lock().unwrap().remove(&handle.0) {
            // The watch winds down when dropped.
            Some(_watch) => Ok(()),
            None => Err(RegistryError::UnknownListener),
        }
    }

    fn open_settings(&self, pane: SettingsPane) -> Result<(), RegistryError> {
        let command_line = match pane {
            SettingsPane::Home => &self.config.home_settings_command,
            SettingsPane::System => &self.config.system_settings_command,
        };
        Self::spawn_command(command_line)
    }
}

struct ExecAction {
    identifier: String,
    exec: String,
}

impl LaunchAction for ExecAction {
    fn start(self: Box<Self>, new_task: bool) -> Result<(), RegistryError> {
        let command_line = desktop_entry::strip_field_codes(&self.exec);
        if command_line.is_empty() {
            return Err(RegistryError::Action(format!(
                "empty exec line for {}",
                self.identifier
            )));
        }

        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(&command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Detach into its own process group so it outlives the frontend.
        #[cfg(unix)]
        if new_task {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        command.spawn()?;
        info!("spawned {}: {command_line}", self.identifier);
        Ok(())
    }
}

fn detect_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"].iter().find_map(|var| {
        std::env::var(var)
            .ok()
            .filter(|value| !value.is_empty() && value != "C" && value != "POSIX")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::AppDirectory;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn registry_over(dir: &TempDir) -> FreedesktopRegistry {
        FreedesktopRegistry::with_config(RegistryConfig {
            application_dirs: vec![dir.path().to_path_buf()],
            icon_dirs: vec![dir.path().join("icons")],
            locale: Some("en_US".to_string()),
            ..RegistryConfig::default()
        })
    }

    fn write_desktop_file(dir: &TempDir, id: &str, name: &str, icon: Option<&str>) {
        let icon_line = icon.map(|i| format!("Icon={i}\n")).unwrap_or_default();
        fs::write(
            dir.path().join(id),
            format!("[Desktop Entry]\nType=Application\nName={name}\nExec=true\n{icon_line}"),
        )
        .unwrap();
    }

    #[test]
    fn queries_report_parsed_entries() {
        let dir = TempDir::new().unwrap();
        write_desktop_file(&dir, "zulu.desktop", "Zulu", None);
        write_desktop_file(&dir, "alpha.desktop", "Alpha", None);
        fs::write(dir.path().join("readme.txt"), "not an app").unwrap();

        let apps = registry_over(&dir).query_launchable_apps().unwrap();
        let mut ids: Vec<String> = apps.into_iter().map(|a| a.identifier).collect();
        ids.sort();
        assert_eq!(ids, ["alpha.desktop", "zulu.desktop"]);
    }

    #[test]
    fn icons_resolve_through_the_index() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("icons")).unwrap();
        image::RgbaImage::new(2, 2)
            .save(dir.path().join("icons/painter.png"))
            .unwrap();
        write_desktop_file(&dir, "painter.desktop", "Painter", Some("painter"));
        write_desktop_file(&dir, "plain.desktop", "Plain", None);

        let apps = registry_over(&dir).query_launchable_apps().unwrap();
        let painter = apps.iter().find(|a| a.identifier == "painter.desktop").unwrap();
        let plain = apps.iter().find(|a| a.identifier == "plain.desktop").unwrap();
        assert!(painter.icon.is_some());
        assert!(plain.icon.is_none());
    }

    #[test]
    fn unknown_identifiers_do_not_resolve() {
        let dir = TempDir::new().unwrap();
        write_desktop_file(&dir, "known.desktop", "Known", None);

        let registry = registry_over(&dir);
        assert!(registry.resolve_launch_action("known.desktop").is_some());
        assert!(registry.resolve_launch_action("does.not.exist").is_none());
    }

    #[test]
    fn unregistering_twice_reports_the_handle_as_unknown() {
        let dir = TempDir::new().unwrap();
        let registry = registry_over(&dir);

        let handle = registry
            .register_lifecycle_listener(Box::new(|_| {}))
            .unwrap();
        let id = handle.0;
        registry.unregister_lifecycle_listener(handle).unwrap();
        assert!(matches!(
            registry.unregister_lifecycle_listener(ListenerHandle(id)),
            Err(RegistryError::UnknownListener)
        ));
    }

    #[test]
    fn full_directory_flow_over_a_scratch_tree() {
        let _ = env_logger::builder().is_test(true).try_init();

        let dir = TempDir::new().unwrap();
        write_desktop_file(&dir, "beta.desktop", "Beta", None);
        write_desktop_file(&dir, "alpha.desktop", "Alpha", None);

        let directory = AppDirectory::new(Arc::new(registry_over(&dir)));
        let catalog = directory.list_apps().unwrap();

        let names: Vec<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta"]);
        assert!(catalog.iter().all(|e| !e.package.is_empty()));
    }
}
