//! What one invocation does: badge a single icon file or a whole icon set.

use std::fmt;
use std::path::PathBuf;

use crate::badge::BadgeCompositor;
use crate::badge::ribbon::RibbonAssets;
use crate::badge::text::TextRenderer;
use crate::badger::Badger;
use crate::batch::{self, BatchAction, BatchReport, IconSet};
use crate::error::Result;
use crate::style::BadgeStyle;

// ============================================================================
// RunSettings
// ============================================================================

/// Settings shared by both kinds of job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSettings {
    pub verbose: bool,

    /// Folder containing `resources/ribbons`.
    pub resources_root: PathBuf,

    /// Extra font files made available to the text renderer.
    pub font_files: Vec<PathBuf>,
}

impl RunSettings {
    /// Folder of fonts shipped next to the ribbons.
    pub fn bundled_font_dir(&self) -> PathBuf {
        self.resources_root.join("resources").join("fonts")
    }

    /// Adds the bundled fonts and every configured font file to `text`.
    pub fn load_fonts(&self, text: &mut TextRenderer) -> Result<()> {
        let dir = self.bundled_font_dir();
        if dir.is_dir() {
            let faces = text.load_font_dir(&dir);
            log::debug!("loaded {faces} bundled font faces from {}", dir.display());
        }

        for font in &self.font_files {
            text.load_font_file(font)?;
            log::debug!("loaded font file {}", font.display());
        }
        Ok(())
    }

    /// Builds a badger for `style` from these settings.
    pub fn badger(&self, style: BadgeStyle) -> Result<Badger> {
        let mut text = TextRenderer::new();
        self.load_fonts(&mut text)?;

        let ribbons = RibbonAssets::new(&self.resources_root);
        Ok(Badger::new(BadgeCompositor::new(ribbons, text), style))
    }
}

impl fmt::Display for RunSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<40} : {}", "verbose", self.verbose)?;
        writeln!(
            f,
            "{:<40} : {}",
            "resources root path",
            self.resources_root.display()
        )?;
        for font in &self.font_files {
            writeln!(f, "{:<40} : {}", "font file", font.display())?;
        }
        Ok(())
    }
}

// ============================================================================
// Job
// ============================================================================

/// What to do with the icon-set pair.
#[derive(Debug, Clone, PartialEq)]
pub enum IconSetAction {
    Badge(BadgeStyle),
    Restore,
}

/// A fully resolved unit of work.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    /// Badge one image file.
    Icon {
        style: BadgeStyle,
        input: PathBuf,
        output: PathBuf,
    },

    /// Badge, or restore, every slot of an icon set from its backup.
    IconSet {
        action: IconSetAction,
        current: IconSet,
        original: IconSet,
    },
}

impl Job {
    pub fn style(&self) -> Option<&BadgeStyle> {
        match self {
            Job::Icon { style, .. } => Some(style),
            Job::IconSet {
                action: IconSetAction::Badge(style),
                ..
            } => Some(style),
            Job::IconSet {
                action: IconSetAction::Restore,
                ..
            } => None,
        }
    }

    /// Runs the job to completion.
    pub fn run(&self, settings: &RunSettings) -> Result<BatchReport> {
        if settings.verbose {
            log::debug!("Config ===================================\n{settings}{self}");
            if let Some(style) = self.style() {
                log::debug!("Style ====================================\n{style}");
            }
        }

        match self {
            Job::Icon {
                style,
                input,
                output,
            } => {
                let badger = settings.badger(style.clone())?;
                badger.process_icon(input, output)?;
                Ok(BatchReport {
                    processed: 1,
                    skipped: 0,
                })
            }
            Job::IconSet {
                action: IconSetAction::Badge(style),
                current,
                original,
            } => {
                let badger = settings.badger(style.clone())?;
                batch::run(original, current, BatchAction::Badge(&badger))
            }
            Job::IconSet {
                action: IconSetAction::Restore,
                current,
                original,
            } => batch::run(original, current, BatchAction::Restore),
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Icon { input, output, .. } => {
                writeln!(f, "{:<40} : {}", "input icon path", input.display())?;
                writeln!(f, "{:<40} : {}", "output icon path", output.display())
            }
            Job::IconSet {
                action,
                current,
                original,
            } => {
                writeln!(f, "{:<40} : {}", "app icon path", current.dir.display())?;
                writeln!(
                    f,
                    "{:<40} : {:02}",
                    "app icon contents images count",
                    current.manifest.images.len()
                )?;
                writeln!(
                    f,
                    "{:<40} : {}",
                    "app icon original path",
                    original.dir.display()
                )?;
                writeln!(
                    f,
                    "{:<40} : {:02}",
                    "app icon original contents images count",
                    original.manifest.images.len()
                )?;
                writeln!(
                    f,
                    "{:<40} : {}",
                    "restore original",
                    matches!(action, IconSetAction::Restore)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{IconManifest, ImageDescriptor};
    use resvg::usvg::fontdb::Database;

    fn icon_sets(root: &std::path::Path) -> (IconSet, IconSet) {
        let image = ImageDescriptor::new("20x20", "iphone", "2x");
        let current = IconSet::new(
            root.join("AppIcon.appiconset"),
            IconManifest::new(vec![image.clone().with_filename("Icon-40.png")]),
        );
        let original = IconSet::new(
            root.join("AppIconOriginal.appiconset"),
            IconManifest::new(vec![image.with_filename("Original-40.png")]),
        );
        std::fs::create_dir_all(&current.dir).unwrap();
        std::fs::create_dir_all(&original.dir).unwrap();
        (current, original)
    }

    #[test]
    fn restore_job_never_touches_fonts_or_ribbons() {
        let root = tempfile::tempdir().unwrap();
        let (current, original) = icon_sets(root.path());
        std::fs::write(original.dir.join("Original-40.png"), b"backup").unwrap();

        let job = Job::IconSet {
            action: IconSetAction::Restore,
            current: current.clone(),
            original,
        };
        // a bogus font file would fail any badging run
        let settings = RunSettings {
            verbose: true,
            resources_root: root.path().join("nowhere"),
            font_files: vec![root.path().join("missing.ttf")],
        };

        let report = job.run(&settings).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(std::fs::read(current.dir.join("Icon-40.png")).unwrap(), b"backup");
    }

    #[test]
    fn bad_font_file_fails_badging_job() {
        let root = tempfile::tempdir().unwrap();
        let settings = RunSettings {
            verbose: false,
            resources_root: root.path().to_path_buf(),
            font_files: vec![root.path().join("missing.ttf")],
        };
        let job = Job::Icon {
            style: BadgeStyle::new("beta"),
            input: root.path().join("in.png"),
            output: root.path().join("out.png"),
        };

        let err = job.run(&settings).unwrap_err();
        assert!(matches!(err, crate::error::Error::FontLoad { .. }));
    }

    #[test]
    fn default_font_ships_with_resources() {
        let settings = RunSettings {
            resources_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            ..RunSettings::default()
        };
        let mut text = TextRenderer::from_database(Database::new());
        settings.load_fonts(&mut text).unwrap();

        let face = text.resolve_font(BadgeStyle::DEFAULT_FONT).unwrap();
        assert_eq!(face.post_script_name, BadgeStyle::DEFAULT_FONT);
    }

    #[test]
    fn missing_font_dir_is_not_an_error() {
        let root = tempfile::tempdir().unwrap();
        let settings = RunSettings {
            resources_root: root.path().to_path_buf(),
            ..RunSettings::default()
        };
        let mut text = TextRenderer::from_database(Database::new());
        settings.load_fonts(&mut text).unwrap();

        assert!(matches!(
            text.resolve_font(BadgeStyle::DEFAULT_FONT),
            Err(crate::error::Error::FontNotFound(_))
        ));
    }

    #[test]
    fn display_lists_icon_set_paths() {
        let root = tempfile::tempdir().unwrap();
        let (current, original) = icon_sets(root.path());
        let job = Job::IconSet {
            action: IconSetAction::Restore,
            current,
            original,
        };

        let dump = job.to_string();
        assert!(dump.contains("app icon contents images count           : 01"));
        assert!(dump.contains("restore original"));
        assert!(dump.lines().any(|l| l.ends_with(": true")));
        assert!(job.style().is_none());
    }
}
