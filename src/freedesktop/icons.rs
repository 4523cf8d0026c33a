//! Icon file lookup across the XDG icon directories.

use crate::icon::IconResource;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Formats the renderer can decode. Vector themes (svg) are skipped; an
/// entry whose only icon is vector renders without one.
const RASTER_EXTENSIONS: [&str; 3] = ["png", "webp", "bmp"];

/// Index of icon name (lowercased file stem) -> path.
pub struct IconIndex {
    index: HashMap<String, PathBuf>,
}

impl IconIndex {
    /// Scan `dirs` once. The first match per stem wins, so directories must
    /// be passed in precedence order.
    pub fn build(dirs: &[PathBuf]) -> Self {
        let mut index = HashMap::new();

        for dir in dirs {
            if !dir.exists() {
                continue;
            }

            let walker = WalkDir::new(dir).follow_links(true).max_depth(10);
            for entry in walker.into_iter().filter_map(|e| e.ok()) {
                if !entry.file_type().is_file() && !entry.file_type().is_symlink() {
                    continue;
                }

                let path = entry.path();
                let ext = match path.extension().and_then(|e| e.to_str()) {
                    Some(e) => e.to_lowercase(),
                    None => continue,
                };
                if !RASTER_EXTENSIONS.contains(&ext.as_str()) {
                    continue;
                }

                let stem = match path.file_stem().and_then(|s| s.to_str()) {
                    Some(s) => s.to_lowercase(),
                    None => continue,
                };

                index.entry(stem).or_insert_with(|| path.to_path_buf());
            }
        }

        debug!("icon index built, {} entries", index.len());
        Self { index }
    }

    /// Resolve an icon name (or absolute path) to a file on disk.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.starts_with('/') {
            let path = PathBuf::from(name);
            return path.exists().then_some(path);
        }
        self.index.get(&name.to_lowercase()).cloned()
    }
}

/// Load an icon file as a ready-made raster resource.
pub fn load_icon(path: &Path) -> Option<IconResource> {
    match image::open(path) {
        Ok(img) => Some(IconResource::Raster(img.to_rgba8())),
        Err(err) => {
            debug!("could not decode icon {}: {err}", path.display());
            None
        }
    }
}
