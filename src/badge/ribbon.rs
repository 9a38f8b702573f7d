//! Ribbon artwork lookup.
//!
//! Ribbons live under `<resources root>/resources/ribbons/` and are named
//! `<color>-<corner>.<ext>`, e.g. `red-bottomRight.png`. PNG wins over SVG
//! when both exist. There is no fallback: a missing ribbon aborts the run.

use std::path::{Path, PathBuf};

use resvg::tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};
use resvg::usvg::{Options, Tree};

use super::geometry::RectF;
use super::svg::{render_tree, rgba_image_to_pixmap};
use crate::error::{Error, Result};
use crate::style::{Corner, RibbonColor};

/// Extensions tried, in order, for every ribbon.
pub const RIBBON_EXTENSIONS: [&str; 2] = ["png", "svg"];

// ============================================================================
// RibbonAsset
// ============================================================================

/// Loaded ribbon artwork.
///
/// Square artwork is drawn over the whole canvas: it already carries the
/// ribbon turned and placed for its corner. Any other aspect ratio is a flat
/// band that gets stretched into the ribbon footprint and turned with the
/// text.
pub enum RibbonAsset {
    Raster(Pixmap),
    Vector(Box<Tree>),
}

impl RibbonAsset {
    /// Natural size of the artwork.
    pub fn size(&self) -> (f32, f32) {
        match self {
            RibbonAsset::Raster(pixmap) => (pixmap.width() as f32, pixmap.height() as f32),
            RibbonAsset::Vector(tree) => (tree.size().width(), tree.size().height()),
        }
    }

    pub fn is_full_canvas(&self) -> bool {
        let (width, height) = self.size();
        (width - height).abs() < 0.5
    }

    /// Draws the artwork stretched into `dest`, then mapped through `transform`.
    pub fn draw(&self, pixmap: &mut Pixmap, dest: RectF, transform: Transform) {
        let (width, height) = self.size();
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let ts = transform
            .pre_translate(dest.x, dest.y)
            .pre_scale(dest.width / width, dest.height / height);

        match self {
            RibbonAsset::Raster(src) => {
                let paint = PixmapPaint {
                    quality: FilterQuality::Bicubic,
                    ..PixmapPaint::default()
                };
                pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, ts, None);
            }
            RibbonAsset::Vector(tree) => render_tree(tree, ts, pixmap),
        }
    }
}

// ============================================================================
// RibbonAssets
// ============================================================================

/// Resolves ribbon artwork from a resources root.
#[derive(Debug, Clone)]
pub struct RibbonAssets {
    root: PathBuf,
}

impl RibbonAssets {
    /// `root` is the tool's resources root; ribbons are looked up in its
    /// `resources/ribbons` subdirectory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ribbon_dir(&self) -> PathBuf {
        self.root.join("resources").join("ribbons")
    }

    /// File stem for a color and corner, e.g. `cyan-topLeft`.
    pub fn file_stem(color: RibbonColor, corner: Corner) -> String {
        format!("{}-{}", color.as_str(), corner.as_str())
    }

    /// Path of the artwork that would be used, or the PNG path if none exists.
    pub fn path_for(&self, color: RibbonColor, corner: Corner) -> PathBuf {
        let dir = self.ribbon_dir();
        let stem = Self::file_stem(color, corner);
        RIBBON_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{stem}.{ext}")))
            .find(|path| path.is_file())
            .unwrap_or_else(|| dir.join(format!("{stem}.{}", RIBBON_EXTENSIONS[0])))
    }

    /// Loads the artwork for a color and corner.
    pub fn resolve(&self, color: RibbonColor, corner: Corner) -> Result<RibbonAsset> {
        let path = self.path_for(color, corner);
        if !path.is_file() {
            return Err(Error::RibbonMissing { path });
        }
        log::debug!("loading ribbon {}", path.display());

        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

        if is_svg {
            load_vector(&path)
        } else {
            load_raster(&path)
        }
    }
}

fn load_raster(path: &Path) -> Result<RibbonAsset> {
    let decode_err = |reason: String| Error::RibbonDecode {
        path: path.to_path_buf(),
        reason,
    };

    let img = image::open(path)
        .map_err(|e| decode_err(e.to_string()))?
        .to_rgba8();
    let pixmap = rgba_image_to_pixmap(&img).ok_or_else(|| decode_err("empty image".into()))?;

    Ok(RibbonAsset::Raster(pixmap))
}

fn load_vector(path: &Path) -> Result<RibbonAsset> {
    let decode_err = |reason: String| Error::RibbonDecode {
        path: path.to_path_buf(),
        reason,
    };

    let data = std::fs::read(path).map_err(|_| Error::RibbonMissing {
        path: path.to_path_buf(),
    })?;

    let opts = Options {
        resources_dir: path.parent().map(Path::to_path_buf),
        ..Options::default()
    };
    let tree = Tree::from_data(&data, &opts).map_err(|e| decode_err(e.to_string()))?;

    Ok(RibbonAsset::Vector(Box::new(tree)))
}

// ============================================================================
// Tests
// ============================================================================
