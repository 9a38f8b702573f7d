//! Badge text layout: font lookup, shrink-to-fit, and rasterisation.
//!
//! Text is laid out by usvg against a shared font database, so measuring and
//! drawing go through exactly the same shaping. Measured boxes use font
//! metrics (advance widths and the ascender/descender span), not glyph ink.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use palette::Srgba;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::fontdb::{self, Database, Family, Query};
use resvg::usvg::Options;

use super::geometry::RectF;
use super::svg::{escape_xml, parse_svg, render_tree};
use crate::error::{Error, Result};

/// Font size decrement per fit iteration.
pub const SHRINK_STEP: f32 = 0.25;

/// Blur radius of the drop shadow under painted text.
pub const SHADOW_BLUR_RADIUS: f32 = 5.0;

// ============================================================================
// FontFace
// ============================================================================

/// A font face resolved from the database, described the way SVG selects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    pub post_script_name: String,
    pub family: String,
    pub weight: u16,
    pub style: &'static str,
    pub stretch: &'static str,
}

impl FontFace {
    fn from_info(info: &fontdb::FaceInfo) -> Option<Self> {
        let family = info.families.first()?.0.clone();

        let style = match info.style {
            fontdb::Style::Normal => "normal",
            fontdb::Style::Italic => "italic",
            fontdb::Style::Oblique => "oblique",
        };

        let stretch = match info.stretch {
            fontdb::Stretch::UltraCondensed => "ultra-condensed",
            fontdb::Stretch::ExtraCondensed => "extra-condensed",
            fontdb::Stretch::Condensed => "condensed",
            fontdb::Stretch::SemiCondensed => "semi-condensed",
            fontdb::Stretch::Normal => "normal",
            fontdb::Stretch::SemiExpanded => "semi-expanded",
            fontdb::Stretch::Expanded => "expanded",
            fontdb::Stretch::ExtraExpanded => "extra-expanded",
            fontdb::Stretch::UltraExpanded => "ultra-expanded",
        };

        Some(Self {
            post_script_name: info.post_script_name.clone(),
            family,
            weight: info.weight.0,
            style,
            stretch,
        })
    }

    /// SVG presentation attributes selecting this face.
    fn svg_attributes(&self) -> String {
        let family = self.family.replace('\\', "\\\\").replace('\'', "\\'");
        format!(
            "font-family=\"'{}'\" font-weight=\"{}\" font-style=\"{}\" font-stretch=\"{}\"",
            escape_xml(&family),
            self.weight,
            self.style,
            self.stretch
        )
    }
}

// ============================================================================
// GlyphRun
// ============================================================================

/// Text fitted to a box, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub text: String,
    pub font: FontFace,
    pub font_size: f32,

    /// Text box relative to the start of the baseline.
    pub bounds: RectF,
}

impl GlyphRun {
    /// Translation that centers the text box on `(cx, cy)`.
    pub fn centered_at(&self, cx: f32, cy: f32) -> Transform {
        let (bx, by) = self.bounds.center();
        Transform::from_translate(cx - bx, cy - by)
    }
}

/// How a glyph run is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPaint {
    pub color: Srgba<u8>,
    pub shadow: bool,
}

// ============================================================================
// TextRenderer
// ============================================================================

/// Measures and draws badge text.
#[derive(Clone)]
pub struct TextRenderer {
    fontdb: Arc<Database>,
}

impl TextRenderer {
    /// Creates a renderer backed by the fonts installed on the system.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("loaded {} system font faces", db.len());
        Self::from_database(db)
    }

    /// Creates a renderer over an explicit font database.
    pub fn from_database(db: Database) -> Self {
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Adds a font file to the database.
    pub fn load_font_file(&mut self, path: &Path) -> Result<()> {
        Arc::make_mut(&mut self.fontdb)
            .load_font_file(path)
            .map_err(|source| Error::FontLoad {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Adds every font file found under `dir`, recursively.
    ///
    /// Returns how many faces were added. Unreadable files are skipped.
    pub fn load_font_dir(&mut self, dir: &Path) -> usize {
        let db = Arc::make_mut(&mut self.fontdb);
        let before = db.len();
        db.load_fonts_dir(dir);
        db.len() - before
    }

    /// Looks a font up by PostScript name, then by family name.
    pub fn resolve_font(&self, name: &str) -> Result<FontFace> {
        let by_post_script = self
            .fontdb
            .faces()
            .find(|face| face.post_script_name == name);

        let info = match by_post_script {
            Some(info) => Some(info),
            None => {
                let families = [Family::Name(name)];
                let query = Query {
                    families: &families,
                    ..Query::default()
                };
                self.fontdb
                    .query(&query)
                    .and_then(|id| self.fontdb.face(id))
                    .filter(|face| {
                        face.families
                            .iter()
                            .any(|(family, _)| family.eq_ignore_ascii_case(name))
                    })
            }
        };

        info.and_then(FontFace::from_info)
            .ok_or_else(|| Error::FontNotFound(name.to_string()))
    }

    /// Measures `text` set in `font` at `size`.
    ///
    /// Text without any visible layout (empty or unsupported glyphs only)
    /// measures as an empty box at the origin.
    pub fn measure(&self, text: &str, font: &FontFace, size: f32) -> Result<RectF> {
        let svg = text_svg(text, font, size, None);
        let tree = parse_svg(&svg, &self.options())?;

        let root = tree.root();
        if !root.has_children() {
            return Ok(RectF::default());
        }

        let bbox = root.bounding_box();
        Ok(RectF::new(bbox.x(), bbox.y(), bbox.width(), bbox.height()))
    }

    /// Shrinks the font from `start_size` in steps of [`SHRINK_STEP`] until the
    /// text fits `max_width` x `max_height`.
    ///
    /// There is no minimum size; the fit only fails once the size would reach
    /// zero.
    pub fn fit(
        &self,
        text: &str,
        font_name: &str,
        start_size: f32,
        max_width: f32,
        max_height: f32,
    ) -> Result<GlyphRun> {
        let font = self.resolve_font(font_name)?;

        let mut size = start_size;
        if size <= 0.0 {
            return Err(Error::TextDoesNotFit(text.to_string()));
        }
        let mut bounds = self.measure(text, &font, size)?;

        while bounds.width > max_width || bounds.height > max_height {
            size -= SHRINK_STEP;
            if size <= 0.0 {
                return Err(Error::TextDoesNotFit(text.to_string()));
            }
            bounds = self.measure(text, &font, size)?;
        }

        log::debug!(
            "fitted \"{}\" in {} at {:.2} ({:.1}x{:.1} within {:.1}x{:.1})",
            text,
            font.post_script_name,
            size,
            bounds.width,
            bounds.height,
            max_width,
            max_height
        );

        Ok(GlyphRun {
            text: text.to_string(),
            font,
            font_size: size,
            bounds,
        })
    }

    /// Draws a glyph run onto `pixmap`; `transform` maps the baseline origin.
    pub fn render(
        &self,
        run: &GlyphRun,
        paint: &TextPaint,
        transform: Transform,
        pixmap: &mut Pixmap,
    ) -> Result<()> {
        let svg = text_svg(&run.text, &run.font, run.font_size, Some(paint));
        let tree = parse_svg(&svg, &self.options())?;
        render_tree(&tree, transform, pixmap);
        Ok(())
    }

    fn options(&self) -> Options<'static> {
        Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Options::default()
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a one-element SVG document holding the text at the origin.
fn text_svg(text: &str, font: &FontFace, size: f32, paint: Option<&TextPaint>) -> String {
    let mut svg = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1">"#);

    let mut fill = String::from("#000000");
    let mut extra = String::new();

    if let Some(paint) = paint {
        let color = paint.color;
        fill = format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue);
        let _ = write!(extra, " fill-opacity=\"{:.4}\"", color.alpha as f32 / 255.0);

        if paint.shadow {
            let _ = write!(
                svg,
                "<defs><filter id=\"shadow\" x=\"-0.5\" y=\"-0.5\" width=\"2\" height=\"2\">\
                 <feDropShadow dx=\"0\" dy=\"0\" stdDeviation=\"{:.2}\" flood-color=\"#000000\"/>\
                 </filter></defs>",
                SHADOW_BLUR_RADIUS / 2.0
            );
            extra.push_str(" filter=\"url(#shadow)\"");
        }
    }

    let _ = write!(
        svg,
        "<text x=\"0\" y=\"0\" xml:space=\"preserve\" {} font-size=\"{}\" fill=\"{}\"{}>{}</text></svg>",
        font.svg_attributes(),
        size,
        fill,
        extra,
        escape_xml(text)
    );

    svg
}

// ============================================================================
// Tests
// ============================================================================
