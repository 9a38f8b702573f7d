//! Asset catalog discovery.
//!
//! The icon set being badged (`<AppIcon>.appiconset`) and its untouched
//! backup (`<AppIconOriginal>.appiconset`) must live side by side in the same
//! asset catalog. The catalog is either given explicitly or found by walking
//! the project tree.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extension of icon-set folders inside an asset catalog.
pub const ICON_SET_EXTENSION: &str = "appiconset";

/// Folder name of the icon set called `name`.
pub fn icon_set_dir_name(name: &str) -> String {
    format!("{name}.{ICON_SET_EXTENSION}")
}

/// The two icon-set folders a target run works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSetPaths {
    /// Icon set the build uses; badged files are written here.
    pub current: PathBuf,
    /// Backup set the badges are composed from.
    pub original: PathBuf,
}

impl IconSetPaths {
    /// Resolves both sets inside `catalog`, requiring the backup to exist.
    pub fn in_catalog(catalog: &Path, app_icon: &str, app_icon_original: &str) -> Result<Self> {
        let current = catalog.join(icon_set_dir_name(app_icon));
        let original = catalog.join(icon_set_dir_name(app_icon_original));

        if !original.is_dir() {
            return Err(Error::BackupMissing {
                name: app_icon_original.to_string(),
                path: original,
            });
        }

        Ok(Self {
            current,
            original,
        })
    }
}

/// Finds the asset catalog containing `<app_icon>.appiconset` under `root`.
///
/// The walk is depth first in file-name order, skips hidden entries, does not
/// follow symlinks, and stops at the first match.
pub fn find_catalog(root: &Path, app_icon: &str) -> Result<PathBuf> {
    let target = icon_set_dir_name(app_icon);
    log::debug!("searching {} for {}", root.display(), target);

    match search(root, &target)? {
        Some(icon_set) => {
            let catalog = icon_set
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            log::debug!("found asset catalog {}", catalog.display());
            Ok(catalog)
        }
        None => Err(Error::AppIconNotFound {
            name: target,
            root: root.to_path_buf(),
        }),
    }
}

fn search(dir: &Path, target: &str) -> Result<Option<PathBuf>> {
    let scan_err = |source| Error::ProjectScan {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(scan_err)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(scan_err)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }

        let file_type = entry.file_type().map_err(scan_err)?;
        if !file_type.is_dir() {
            continue;
        }

        let path = entry.path();
        if name == target {
            return Ok(Some(path));
        }
        if let Some(found) = search(&path, target)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}
