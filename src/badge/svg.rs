//! SVG and pixmap plumbing shared by the ribbon and text layers.
//!
//! Ribbons and text are drawn through resvg onto premultiplied tiny-skia
//! pixmaps; icons are straight-alpha [`RgbaImage`]s. This module parses and
//! renders SVG documents and converts between the two pixel layouts.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{Error, Result};

// ============================================================================
// SVG
// ============================================================================

/// Parses generated SVG markup.
pub fn parse_svg(svg_data: &str, opts: &Options) -> Result<Tree> {
    Tree::from_str(svg_data, opts).map_err(|e| Error::TextLayout(e.to_string()))
}

/// Renders `tree` onto `pixmap` through `transform`.
pub fn render_tree(tree: &Tree, transform: Transform, pixmap: &mut Pixmap) {
    resvg::render(tree, transform, &mut pixmap.as_mut());
}

/// Escapes `&`, `<`, `>` and both quote characters.
pub fn escape_xml(text: &str) -> String {
    text.chars().fold(String::with_capacity(text.len()), |mut out, c| {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
        out
    })
}

// ============================================================================
// Pixel layouts
// ============================================================================

/// Copies a premultiplied pixmap into a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (out, px) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = if px.alpha() == 0 {
            ColorU8::from_rgba(0, 0, 0, 0)
        } else {
            px.demultiply()
        };
        *out = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Copies a straight-alpha image into a premultiplied pixmap.
///
/// Returns `None` for an empty image.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (out, &Rgba([r, g, b, a])) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        *out = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISC: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><circle cx="50" cy="50" r="40" fill="#ff0000"/></svg>"##;

    #[test]
    fn renders_scaled_disc() {
        let tree = parse_svg(DISC, &Options::default()).unwrap();
        let mut pixmap = Pixmap::new(50, 50).unwrap();
        render_tree(&tree, Transform::from_scale(0.5, 0.5), &mut pixmap);

        let img = pixmap_to_rgba_image(&pixmap);
        assert_eq!(img.get_pixel(25, 25).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn malformed_markup_is_an_error() {
        let result = parse_svg("<svg", &Options::default());
        assert!(matches!(result, Err(Error::TextLayout(_))));
    }

    #[test]
    fn translucent_pixels_survive_both_layouts() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([12, 34, 56, 255]));
        img.put_pixel(1, 0, Rgba([200, 100, 0, 128]));

        let back = pixmap_to_rgba_image(&rgba_image_to_pixmap(&img).unwrap());
        assert_eq!(back.get_pixel(0, 0), img.get_pixel(0, 0));

        let [r, g, b, a] = back.get_pixel(1, 0).0;
        assert_eq!(a, 128);
        assert!(r.abs_diff(200) <= 2 && g.abs_diff(100) <= 2 && b == 0);
    }

    #[test]
    fn empty_image_has_no_pixmap() {
        assert!(rgba_image_to_pixmap(&RgbaImage::new(0, 4)).is_none());
    }

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
        assert_eq!(escape_xml("1.0 - 42"), "1.0 - 42");
    }
}
