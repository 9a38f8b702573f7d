//! Icon badging: composes a badge at the icon's size and lays it over the icon.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::badge::BadgeCompositor;
use crate::error::{Error, Result};
use crate::icon::IconImage;
use crate::style::BadgeStyle;

// ============================================================================
// Overlay
// ============================================================================

/// Lays `badge` over `source` at the origin with plain alpha-over.
///
/// Both rasters must have identical pixel dimensions; nothing is resampled.
pub fn overlay(source: &RgbaImage, badge: &RgbaImage) -> Result<RgbaImage> {
    if source.dimensions() != badge.dimensions() {
        return Err(Error::SizeMismatch {
            icon_width: source.width(),
            icon_height: source.height(),
            badge_width: badge.width(),
            badge_height: badge.height(),
        });
    }

    let mut output = source.clone();
    for (dst, src) in output.pixels_mut().zip(badge.pixels()) {
        *dst = source_over(*src, *dst);
    }
    Ok(output)
}

/// Porter-Duff source-over for straight-alpha pixels.
fn source_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src.0[3] {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    let sa = src.0[3] as f32 / 255.0;
    let da = dst.0[3] as f32 / 255.0 * (1.0 - sa);
    let alpha = sa + da;

    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().take(3).enumerate() {
        let mixed = (src.0[i] as f32 * sa + dst.0[i] as f32 * da) / alpha;
        *channel = mixed.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (alpha * 255.0).round() as u8;
    Rgba(out)
}

// ============================================================================
// Badger
// ============================================================================

/// Applies one badge style to any number of icons.
///
/// The style is fixed for the lifetime of the badger; every icon gets a badge
/// composed at its own pixel size.
pub struct Badger {
    compositor: BadgeCompositor,
    style: BadgeStyle,
}

impl Badger {
    pub fn new(compositor: BadgeCompositor, style: BadgeStyle) -> Self {
        Self { compositor, style }
    }

    /// Returns a badged copy of `icon`.
    pub fn badge_icon(&self, icon: &IconImage) -> Result<IconImage> {
        let badge = self.compositor.compose(&self.style, icon.canvas())?;
        let output = overlay(&icon.data, &badge)?;
        Ok(IconImage::new(output))
    }

    /// Reads the icon at `input`, badges it, and writes a PNG to `output`.
    ///
    /// `input` and `output` may be the same file.
    pub fn process_icon(&self, input: &Path, output: &Path) -> Result<()> {
        let icon = IconImage::open(input)?;
        let size = icon.dimensions();
        log::debug!(
            "badging {} ({}x{})",
            input.display(),
            size.width,
            size.height
        );

        let badged = self.badge_icon(&icon)?;
        badged.save_png(output)?;

        log::info!("badged {} -> {}", input.display(), output.display());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
