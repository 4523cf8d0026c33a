//! Lifecycle broadcasts from filesystem watches on the application
//! directories.

use crate::registry::{LifecycleCallback, RawLifecycleEvent, actions};
use log::{debug, warn};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

/// A live watch over the application directories.
///
/// Dropping it closes the watcher side of the channel; the relay thread then
/// drains and exits on its own.
pub struct DirectoryWatch {
    _watcher: RecommendedWatcher,
}

/// Start watching `dirs` for `.desktop` churn, reporting every change to
/// `callback`. Directories that do not exist are skipped.
pub fn spawn(
    dirs: &[PathBuf],
    callback: LifecycleCallback,
) -> Result<DirectoryWatch, notify::Error> {
    let (tx, rx) = mpsc::channel::<Result<Event, notify::Error>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )?;

    for dir in dirs {
        if !dir.exists() {
            continue;
        }
        if let Err(err) = watcher.watch(dir, RecursiveMode::Recursive) {
            warn!("could not watch {}: {err}", dir.display());
        }
    }

    thread::spawn(move || {
        while let Ok(result) = rx.recv() {
            match result {
                Ok(event) => {
                    if let Some(raw) = classify(&event) {
                        callback(raw);
                    }
                }
                Err(err) => debug!("watch error: {err}"),
            }
        }
        debug!("application directory watch stopped");
    });

    Ok(DirectoryWatch { _watcher: watcher })
}

/// Map a filesystem event on a `.desktop` file to a raw lifecycle event.
fn classify(event: &Event) -> Option<RawLifecycleEvent> {
    let action = match event.kind {
        EventKind::Create(_) => actions::PACKAGE_ADDED,
        EventKind::Remove(_) => actions::PACKAGE_REMOVED,
        EventKind::Modify(_) => actions::PACKAGE_CHANGED,
        _ => return None,
    };

    let id = event.paths.iter().find_map(|path| desktop_id(path))?;
    Some(RawLifecycleEvent {
        action: action.to_string(),
        data: Some(format!("pkg:{id}")),
    })
}

fn desktop_id(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("desktop") {
        return None;
    }
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
