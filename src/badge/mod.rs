//! Badge synthesis: a turned ribbon with fitted text on a transparent canvas.
//!
//! # Layers
//!
//! 1. **Ribbon** ([`ribbon`]) - artwork for the style's color and corner
//! 2. **Text** ([`text`]) - shrunk to fit the ribbon, then either painted with
//!    a drop shadow or punched out of the ribbon in mask mode
//!
//! Both layers share one [`RibbonPlacement`](geometry::RibbonPlacement)
//! transform, so the text always follows the ribbon's angle.

pub mod geometry;
pub mod ribbon;
pub mod svg;
pub mod text;

use image::RgbaImage;
use resvg::tiny_skia::{BlendMode, Pixmap, PixmapPaint, Transform};

use crate::error::{Error, Result};
use crate::icon::CanvasSize;
use crate::style::BadgeStyle;

use geometry::{RectF, RibbonPlacement};
use ribbon::RibbonAssets;
use svg::pixmap_to_rgba_image;
use text::{TextPaint, TextRenderer};

// ============================================================================
// BadgeCompositor
// ============================================================================

/// Renders badge-only rasters for a given style and canvas.
#[derive(Clone)]
pub struct BadgeCompositor {
    ribbons: RibbonAssets,
    text: TextRenderer,
}

impl BadgeCompositor {
    pub fn new(ribbons: RibbonAssets, text: TextRenderer) -> Self {
        Self { ribbons, text }
    }

    /// Renders the badge for `style` on a transparent canvas of exactly
    /// `canvas` pixels.
    pub fn compose(&self, style: &BadgeStyle, canvas: CanvasSize) -> Result<RgbaImage> {
        let size = canvas.to_pixels()?;
        let placement = RibbonPlacement::new(canvas, style.ribbon_corner);
        let ribbon = self.ribbons.resolve(style.ribbon_color, style.ribbon_corner)?;

        let mut pixmap = Pixmap::new(size.width, size.height).ok_or(Error::InvalidCanvas {
            width: size.width,
            height: size.height,
        })?;

        if ribbon.is_full_canvas() {
            let full = RectF::new(0.0, 0.0, canvas.width, canvas.height);
            ribbon.draw(&mut pixmap, full, Transform::identity());
        } else {
            ribbon.draw(&mut pixmap, placement.footprint, placement.transform());
        }

        if !style.text.is_empty() {
            self.draw_text(style, &placement, &mut pixmap)?;
        }

        Ok(pixmap_to_rgba_image(&pixmap))
    }

    fn draw_text(
        &self,
        style: &BadgeStyle,
        placement: &RibbonPlacement,
        pixmap: &mut Pixmap,
    ) -> Result<()> {
        let (max_width, max_height) = placement.text_bounds();
        let run = self.text.fit(
            &style.text,
            &style.font_name,
            placement.text_start_size(),
            max_width,
            max_height,
        )?;

        let (cx, cy) = placement.center();
        // positive bias lifts the text; raster y grows downward
        let cy = cy - style.text_vertical_bias() * placement.footprint.height;
        let transform = placement.transform().pre_concat(run.centered_at(cx, cy));

        let paint = TextPaint {
            color: style.text_color,
            shadow: !style.text_as_mask,
        };

        // text gets its own layer so mask mode can erase through it in one pass
        let mut layer = Pixmap::new(pixmap.width(), pixmap.height()).ok_or(
            Error::InvalidCanvas {
                width: pixmap.width(),
                height: pixmap.height(),
            },
        )?;
        self.text.render(&run, &paint, transform, &mut layer)?;

        let blend_mode = if style.text_as_mask {
            BlendMode::DestinationOut
        } else {
            BlendMode::SourceOver
        };
        let layer_paint = PixmapPaint {
            blend_mode,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, layer.as_ref(), &layer_paint, Transform::identity(), None);

        log::debug!(
            "drew \"{}\" at {:.2}pt ({})",
            run.text,
            run.font_size,
            if style.text_as_mask { "mask" } else { "paint" }
        );

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Corner, RibbonColor};
    use resvg::tiny_skia::Point;
    use resvg::usvg::fontdb::Database;
    use std::path::Path;

    const BAND_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="283" height="88"><rect width="283" height="88" fill="#800000"/></svg>"##;

    fn compositor(resources: &Path) -> BadgeCompositor {
        let ribbons = resources.join("resources").join("ribbons");
        std::fs::create_dir_all(&ribbons).unwrap();
        for corner in Corner::ALL {
            let stem = RibbonAssets::file_stem(RibbonColor::Red, corner);
            std::fs::write(ribbons.join(format!("{stem}.svg")), BAND_SVG).unwrap();
        }

        let mut text = TextRenderer::from_database(Database::new());
        let font = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSans-Bold.ttf");
        text.load_font_file(&font).unwrap();

        BadgeCompositor::new(RibbonAssets::new(resources), text)
    }

    fn style(corner: Corner) -> BadgeStyle {
        BadgeStyle::new("beta").with_ribbon(RibbonColor::Red, corner)
    }

    #[test]
    fn compose_matches_canvas_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = compositor(dir.path());

        for (w, h) in [(20, 20), (120, 120), (300, 200), (87, 161)] {
            let badge = compositor
                .compose(&style(Corner::BottomRight), CanvasSize::new(w as f32, h as f32))
                .unwrap();
            assert_eq!(badge.dimensions(), (w, h));
        }
    }

    #[test]
    fn badge_is_transparent_away_from_ribbon() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = compositor(dir.path());

        let badge = compositor
            .compose(&style(Corner::TopLeft), CanvasSize::new(200.0, 200.0))
            .unwrap();

        // opposite corner
        assert_eq!(badge.get_pixel(190, 190).0[3], 0);
        assert_eq!(badge.get_pixel(100, 190).0[3], 0);

        // ribbon center is covered
        let placement = RibbonPlacement::new(CanvasSize::new(200.0, 200.0), Corner::TopLeft);
        let (cx, cy) = placement.center();
        assert!(badge.get_pixel(cx as u32, cy as u32).0[3] > 0);
    }

    #[test]
    fn each_corner_lands_in_its_quadrant() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = compositor(dir.path());

        let expected = [
            (Corner::TopLeft, (45, 45)),
            (Corner::TopRight, (155, 45)),
            (Corner::BottomRight, (155, 155)),
            (Corner::BottomLeft, (45, 155)),
        ];

        for (corner, (x, y)) in expected {
            let badge = compositor
                .compose(&style(corner), CanvasSize::new(200.0, 200.0))
                .unwrap();
            assert!(badge.get_pixel(x, y).0[3] > 0, "{corner}: no ribbon at ({x}, {y})");
            assert_eq!(badge.get_pixel(200 - x, 200 - y).0[3], 0, "{corner}: opposite corner drawn");
        }
    }

    #[test]
    fn mask_mode_cuts_text_out_of_ribbon() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = compositor(dir.path());
        let canvas = CanvasSize::new(240.0, 240.0);

        let painted = compositor.compose(&style(Corner::BottomLeft), canvas).unwrap();
        let masked = compositor
            .compose(&style(Corner::BottomLeft).with_mask(true), canvas)
            .unwrap();

        let alpha_sum = |img: &RgbaImage| img.pixels().map(|p| p.0[3] as u64).sum::<u64>();
        assert!(alpha_sum(&masked) < alpha_sum(&painted));

        // somewhere the painted glyph is opaque and the mask left a hole
        let holes = painted
            .pixels()
            .zip(masked.pixels())
            .filter(|(p, m)| p.0[3] == 255 && m.0[3] == 0)
            .count();
        assert!(holes > 0);

        // transparent areas agree
        assert_eq!(painted.get_pixel(230, 10), masked.get_pixel(230, 10));
    }

    fn white_ink_centroid(img: &RgbaImage) -> (f32, f32) {
        let (mut sx, mut sy, mut n) = (0.0, 0.0, 0.0);
        for (x, y, p) in img.enumerate_pixels() {
            if p.0.iter().all(|&c| c > 200) {
                sx += x as f32;
                sy += y as f32;
                n += 1.0;
            }
        }
        assert!(n > 0.0, "no text pixels");
        (sx / n, sy / n)
    }

    #[test]
    fn vertical_bias_lifts_text_across_the_ribbon() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = compositor(dir.path());
        let canvas = CanvasSize::new(400.0, 400.0);
        let placement = RibbonPlacement::new(canvas, Corner::BottomRight);

        let centered = compositor.compose(&style(Corner::BottomRight), canvas).unwrap();
        let lifted = compositor
            .compose(&style(Corner::BottomRight).with_vertical_bias(0.5).unwrap(), canvas)
            .unwrap();

        let (x0, y0) = white_ink_centroid(&centered);
        let (x1, y1) = white_ink_centroid(&lifted);
        let (dx, dy) = (x1 - x0, y1 - y0);

        // half a ribbon height "up" in the ribbon's frame, turned with it
        let (cx, cy) = placement.center();
        let lift = 0.5 * placement.footprint.height;
        let mut points = [Point::from_xy(cx, cy), Point::from_xy(cx, cy - lift)];
        placement.transform().map_points(&mut points);
        let expected_dx = points[1].x - points[0].x;
        let expected_dy = points[1].y - points[0].y;

        assert!((dx - expected_dx).abs() < 1.5, "dx {dx} vs {expected_dx}");
        assert!((dy - expected_dy).abs() < 1.5, "dy {dy} vs {expected_dy}");

        // the top edge of a bottom-right ribbon faces the icon center
        assert!(dx < -20.0 && dy < -20.0, "moved by ({dx}, {dy})");
        let moved = (dx * dx + dy * dy).sqrt();
        assert!((moved - lift).abs() < 1.5, "moved {moved}, expected {lift}");
    }

    #[test]
    fn empty_text_draws_only_the_ribbon() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = compositor(dir.path());
        let canvas = CanvasSize::new(100.0, 100.0);

        let plain = compositor
            .compose(&BadgeStyle::new("").with_ribbon(RibbonColor::Red, Corner::TopRight), canvas)
            .unwrap();
        let masked = compositor
            .compose(
                &BadgeStyle::new("")
                    .with_ribbon(RibbonColor::Red, Corner::TopRight)
                    .with_mask(true),
                canvas,
            )
            .unwrap();

        assert_eq!(plain, masked);
    }

    #[test]
    fn missing_ribbon_fails() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = compositor(dir.path());
        let style = BadgeStyle::new("beta").with_ribbon(RibbonColor::Gold, Corner::TopLeft);

        let result = compositor.compose(&style, CanvasSize::new(64.0, 64.0));
        assert!(matches!(result, Err(Error::RibbonMissing { .. })));
    }

    #[test]
    fn unknown_font_fails() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = compositor(dir.path());
        let style = style(Corner::TopLeft).with_font("Not-A-Font");

        let result = compositor.compose(&style, CanvasSize::new(64.0, 64.0));
        assert!(matches!(result, Err(Error::FontNotFound(_))));
    }

    #[test]
    fn empty_canvas_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = compositor(dir.path());

        let result = compositor.compose(&style(Corner::TopLeft), CanvasSize::new(0.0, 64.0));
        assert!(matches!(result, Err(Error::InvalidCanvas { .. })));
    }
}
