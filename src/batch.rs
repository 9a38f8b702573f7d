//! Icon-set batch processing.
//!
//! Walks the original (backup) icon set in manifest order, pairs every slot
//! with the same slot of the current icon set, and either badges the original
//! into the current file or copies it back verbatim. Slots missing on either
//! side are skipped with a warning; any read or write failure ends the run.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::badger::Badger;
use crate::error::{Error, Result};
use crate::icon::write_atomic;
use crate::manifest::{IconManifest, ImageDescriptor};

// ============================================================================
// IconSet
// ============================================================================

/// An `.appiconset` folder with its parsed manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSet {
    pub dir: PathBuf,
    pub manifest: IconManifest,
}

impl IconSet {
    pub fn new(dir: impl Into<PathBuf>, manifest: IconManifest) -> Self {
        Self {
            dir: dir.into(),
            manifest,
        }
    }

    /// Loads the folder's `Contents.json`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let manifest = IconManifest::load(&dir)?;
        Ok(Self { dir, manifest })
    }

    /// Path of the file registered for `image`'s slot, if any.
    pub fn file_for(&self, image: &ImageDescriptor) -> Option<PathBuf> {
        self.manifest
            .filename_for(&image.size, &image.scale, &image.idiom)
            .map(|name| self.dir.join(name))
    }
}

// ============================================================================
// BatchAction
// ============================================================================

/// What happens to each paired slot.
#[derive(Clone, Copy)]
pub enum BatchAction<'a> {
    /// Badge the original and write it over the current file.
    Badge(&'a Badger),
    /// Copy the original bytes over the current file.
    Restore,
}

impl BatchAction<'_> {
    fn verb(&self) -> &'static str {
        match self {
            BatchAction::Badge(_) => "badged",
            BatchAction::Restore => "restored",
        }
    }
}

/// Outcome counts of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} processed, {} skipped", self.processed, self.skipped)
    }
}

// ============================================================================
// Batch Run
// ============================================================================

/// Applies `action` to every slot of `original` that also exists in `current`.
pub fn run(original: &IconSet, current: &IconSet, action: BatchAction<'_>) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for image in &original.manifest.images {
        let Some(source) = original.file_for(image) else {
            log::warn!(
                "no original icon for {} in {}, skipping",
                image.slot(),
                original.dir.display()
            );
            report.skipped += 1;
            continue;
        };

        let Some(destination) = current.file_for(image) else {
            log::warn!(
                "no app icon for {} in {}, skipping",
                image.slot(),
                current.dir.display()
            );
            report.skipped += 1;
            continue;
        };

        log::debug!("{}: {} -> {}", image.slot(), source.display(), destination.display());

        match action {
            BatchAction::Badge(badger) => badger.process_icon(&source, &destination)?,
            BatchAction::Restore => copy_file(&source, &destination)?,
        }

        log::info!("{} {}", action.verb(), destination.display());
        report.processed += 1;
    }

    Ok(report)
}

/// Copies `from` over `to` byte for byte, replacing `to` atomically.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let copy_err = |source| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let bytes = std::fs::read(from).map_err(copy_err)?;
    write_atomic(to, &bytes).map_err(copy_err)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn icon_set(dir: &Path, files: &[(&str, &str, &str, Option<&str>)]) -> IconSet {
        std::fs::create_dir_all(dir).unwrap();
        let images = files
            .iter()
            .map(|(size, scale, idiom, filename)| {
                let image = ImageDescriptor::new(*size, *idiom, *scale);
                match filename {
                    Some(name) => image.with_filename(*name),
                    None => image,
                }
            })
            .collect();
        IconSet::new(dir, IconManifest::new(images))
    }

    #[test]
    fn restore_copies_bytes_and_skips_empty_slots() {
        let root = tempfile::tempdir().unwrap();
        let original = icon_set(
            &root.path().join("AppIconOriginal.appiconset"),
            &[
                ("20x20", "2x", "iphone", Some("orig-40.png")),
                ("20x20", "1x", "ipad", None),
                ("60x60", "3x", "iphone", Some("orig-180.png")),
            ],
        );
        let current = icon_set(
            &root.path().join("AppIcon.appiconset"),
            &[
                ("20x20", "2x", "iphone", Some("Icon-40.png")),
                ("60x60", "3x", "iphone", Some("Icon-180.png")),
            ],
        );

        // not real images: restore must not decode anything
        std::fs::write(original.dir.join("orig-40.png"), b"\x00forty").unwrap();
        std::fs::write(original.dir.join("orig-180.png"), b"\x01one-eighty").unwrap();
        std::fs::write(current.dir.join("Icon-40.png"), b"badged").unwrap();

        let report = run(&original, &current, BatchAction::Restore).unwrap();

        assert_eq!(report, BatchReport { processed: 2, skipped: 1 });
        assert_eq!(std::fs::read(current.dir.join("Icon-40.png")).unwrap(), b"\x00forty");
        assert_eq!(
            std::fs::read(current.dir.join("Icon-180.png")).unwrap(),
            b"\x01one-eighty"
        );
    }

    #[test]
    fn slot_missing_from_current_set_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let original = icon_set(
            &root.path().join("orig"),
            &[("1024x1024", "1x", "ios-marketing", Some("big.png"))],
        );
        let current = icon_set(&root.path().join("cur"), &[]);
        std::fs::write(original.dir.join("big.png"), b"png").unwrap();

        let report = run(&original, &current, BatchAction::Restore).unwrap();
        assert_eq!(report, BatchReport { processed: 0, skipped: 1 });
        assert_eq!(std::fs::read_dir(&current.dir).unwrap().count(), 0);
    }

    #[test]
    fn missing_original_file_aborts() {
        let root = tempfile::tempdir().unwrap();
        let original = icon_set(
            &root.path().join("orig"),
            &[("20x20", "2x", "iphone", Some("gone.png"))],
        );
        let current = icon_set(
            &root.path().join("cur"),
            &[("20x20", "2x", "iphone", Some("Icon.png"))],
        );

        let result = run(&original, &current, BatchAction::Restore);
        assert!(matches!(result, Err(Error::Copy { .. })));
    }

    #[test]
    fn icon_set_open_reads_manifest() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("AppIcon.appiconset");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("Contents.json"),
            r#"{"images":[{"size":"29x29","idiom":"iphone","filename":"s.png","scale":"2x"}]}"#,
        )
        .unwrap();

        let set = IconSet::open(&dir).unwrap();
        let image = &set.manifest.images[0];
        assert_eq!(set.file_for(image), Some(dir.join("s.png")));
    }

    #[test]
    fn report_display() {
        let report = BatchReport { processed: 3, skipped: 1 };
        assert_eq!(report.to_string(), "3 processed, 1 skipped");
    }
}
