//! Badge style model.
//!
//! A [`BadgeStyle`] describes one badge: the text and how it is painted, and
//! which ribbon artwork carries it. It is built once per run from parsed
//! options and never mutated afterwards.

use std::fmt;

use palette::Srgba;

use crate::error::{Error, Result};

// ============================================================================
// Corner
// ============================================================================

/// Canvas corner the ribbon is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Corner {
    #[cfg_attr(feature = "cli", value(alias = "topLeft"))]
    TopLeft,
    #[cfg_attr(feature = "cli", value(alias = "topRight"))]
    TopRight,
    #[default]
    #[cfg_attr(feature = "cli", value(alias = "bottomRight"))]
    BottomRight,
    #[cfg_attr(feature = "cli", value(alias = "bottomLeft"))]
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Name used in ribbon resource file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "topLeft",
            Corner::TopRight => "topRight",
            Corner::BottomRight => "bottomRight",
            Corner::BottomLeft => "bottomLeft",
        }
    }

    /// Unit direction from the canvas center toward this corner, y pointing up.
    pub fn direction(&self) -> (f32, f32) {
        match self {
            Corner::TopLeft => (-1.0, 1.0),
            Corner::TopRight => (1.0, 1.0),
            Corner::BottomRight => (1.0, -1.0),
            Corner::BottomLeft => (-1.0, -1.0),
        }
    }

    /// Ribbon rotation in degrees, counter-clockwise positive.
    pub fn rotation_degrees(&self) -> f32 {
        match self {
            Corner::TopLeft | Corner::BottomRight => 45.0,
            Corner::TopRight | Corner::BottomLeft => -45.0,
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RibbonColor
// ============================================================================

/// Color variant of the ribbon artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RibbonColor {
    Blue,
    #[default]
    Cyan,
    Gold,
    Green,
    Purple,
    Red,
}

impl RibbonColor {
    pub const ALL: [RibbonColor; 6] = [
        RibbonColor::Blue,
        RibbonColor::Cyan,
        RibbonColor::Gold,
        RibbonColor::Green,
        RibbonColor::Purple,
        RibbonColor::Red,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RibbonColor::Blue => "blue",
            RibbonColor::Cyan => "cyan",
            RibbonColor::Gold => "gold",
            RibbonColor::Green => "green",
            RibbonColor::Purple => "purple",
            RibbonColor::Red => "red",
        }
    }
}

impl fmt::Display for RibbonColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Text color
// ============================================================================

/// Parses `#RRGGBBAA` or `#RRGGBB` (leading `#` optional) into a color.
///
/// A missing alpha component means fully opaque.
pub fn parse_hex_color(value: &str) -> Result<Srgba<u8>> {
    let hex = value.trim().trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor(value.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidColor(value.to_string()))
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };

    Ok(Srgba::new(channel(0)?, channel(2)?, channel(4)?, alpha))
}

/// Formats a color back to `#RRGGBBAA`.
pub fn format_hex_color(color: &Srgba<u8>) -> String {
    format!(
        "#{:02X}{:02X}{:02X}{:02X}",
        color.red, color.green, color.blue, color.alpha
    )
}

// ============================================================================
// BadgeStyle
// ============================================================================

/// Style of the badge.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeStyle {
    /// Text painted on the ribbon, already resolved from any keyword.
    pub text: String,

    /// Text fill color, straight (non-premultiplied) alpha.
    pub text_color: Srgba<u8>,

    /// PostScript or family name of the font.
    pub font_name: String,

    /// Cut the text out of the ribbon instead of painting it.
    pub text_as_mask: bool,

    pub ribbon_corner: Corner,

    pub ribbon_color: RibbonColor,

    /// Vertical nudge of the text in ribbon heights, positive moves it up.
    ///
    /// Always within `-1.0..=1.0`.
    text_vertical_bias: f32,
}

impl BadgeStyle {
    /// Shipped under `resources/fonts`, so it resolves without system fonts.
    pub const DEFAULT_FONT: &'static str = "DejaVuSans-Bold";

    /// Creates a style with white text, the default font, and a cyan
    /// bottom-right ribbon.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            text_color: Srgba::new(255, 255, 255, 255),
            font_name: Self::DEFAULT_FONT.to_string(),
            text_as_mask: false,
            ribbon_corner: Corner::default(),
            ribbon_color: RibbonColor::default(),
            text_vertical_bias: 0.0,
        }
    }

    pub fn with_text_color(mut self, color: Srgba<u8>) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    pub fn with_mask(mut self, text_as_mask: bool) -> Self {
        self.text_as_mask = text_as_mask;
        self
    }

    pub fn with_ribbon(mut self, color: RibbonColor, corner: Corner) -> Self {
        self.ribbon_color = color;
        self.ribbon_corner = corner;
        self
    }

    /// Sets the vertical text bias. Values outside `-1.0..=1.0` are rejected.
    pub fn with_vertical_bias(mut self, bias: f32) -> Result<Self> {
        if !(-1.0..=1.0).contains(&bias) {
            return Err(Error::InvalidBias(bias));
        }
        self.text_vertical_bias = bias;
        Ok(self)
    }

    pub fn text_vertical_bias(&self) -> f32 {
        self.text_vertical_bias
    }
}

impl fmt::Display for BadgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<40} : {}", "text", self.text)?;
        writeln!(f, "{:<40} : {}", "text color", format_hex_color(&self.text_color))?;
        writeln!(f, "{:<40} : {}", "font name", self.font_name)?;
        writeln!(f, "{:<40} : {}", "text as mask", self.text_as_mask)?;
        writeln!(f, "{:<40} : {:.4}", "text vertical bias", self.text_vertical_bias)?;
        writeln!(f, "{:<40} : {}", "ribbon position", self.ribbon_corner)?;
        writeln!(f, "{:<40} : {}", "ribbon color", self.ribbon_color)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_with_alpha() {
        let color = parse_hex_color("#FF800040").unwrap();
        assert_eq!(
            (color.red, color.green, color.blue, color.alpha),
            (255, 128, 0, 64)
        );
    }

    #[test]
    fn parse_color_without_alpha_is_opaque() {
        let color = parse_hex_color("00ff00").unwrap();
        assert_eq!(color.alpha, 255);
        assert_eq!(color.green, 255);
    }

    #[test]
    fn parse_color_rejects_garbage() {
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#GGGGGGGG").is_err());
        assert!(parse_hex_color("").is_err());
    }

    #[test]
    fn format_color_is_uppercase_rgba() {
        let color = parse_hex_color("#0a0b0c0d").unwrap();
        assert_eq!(format_hex_color(&color), "#0A0B0C0D");
    }

    #[test]
    fn corner_directions_point_at_their_corner() {
        assert_eq!(Corner::TopLeft.direction(), (-1.0, 1.0));
        assert_eq!(Corner::TopRight.direction(), (1.0, 1.0));
        assert_eq!(Corner::BottomRight.direction(), (1.0, -1.0));
        assert_eq!(Corner::BottomLeft.direction(), (-1.0, -1.0));
    }

    #[test]
    fn diagonal_corners_share_rotation() {
        assert_eq!(Corner::TopLeft.rotation_degrees(), 45.0);
        assert_eq!(Corner::BottomRight.rotation_degrees(), 45.0);
        assert_eq!(Corner::TopRight.rotation_degrees(), -45.0);
        assert_eq!(Corner::BottomLeft.rotation_degrees(), -45.0);
    }

    #[test]
    fn bias_is_range_checked() {
        assert!(BadgeStyle::new("beta").with_vertical_bias(1.0).is_ok());
        assert!(BadgeStyle::new("beta").with_vertical_bias(-1.0).is_ok());
        assert!(BadgeStyle::new("beta").with_vertical_bias(1.5).is_err());
    }

    #[test]
    fn description_lists_every_field() {
        let style = BadgeStyle::new("alpha").with_ribbon(RibbonColor::Gold, Corner::TopLeft);
        let text = style.to_string();
        assert!(text.contains("alpha"));
        assert!(text.contains("gold"));
        assert!(text.contains("topLeft"));
        assert!(text.contains("#FFFFFFFF"));
    }
}
