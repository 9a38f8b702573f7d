//! Ribbon placement on the canvas.
//!
//! All ratios come from a 450x450 reference artwork and scale linearly with
//! the canvas. Rectangles are in raster coordinates (y pointing down); corner
//! offsets are reported in y-up coordinates to match [`Corner::direction`].

use resvg::tiny_skia::Transform;

use crate::icon::CanvasSize;
use crate::style::Corner;

/// Ribbon width as a fraction of canvas width.
pub const RIBBON_WIDTH_FACTOR: f32 = 283.0 / 450.0;
/// Ribbon height as a fraction of canvas height.
pub const RIBBON_HEIGHT_FACTOR: f32 = 87.68 / 450.0;
/// Distance the ribbon center moves toward its corner, per axis.
pub const CORNER_OFFSET_FACTOR: f32 = 0.2745;
/// Horizontal room kept free of text inside the ribbon.
pub const TEXT_PADDING_FACTOR: f32 = 0.1;
/// Font size the text fit starts from.
pub const TEXT_START_SIZE_FACTOR: f32 = 0.15;

/// An axis-aligned rectangle in floating point raster coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Returns a rect of the given size sharing this rect's center.
    pub fn centered(&self, width: f32, height: f32) -> RectF {
        let (cx, cy) = self.center();
        RectF::new(cx - width * 0.5, cy - height * 0.5, width, height)
    }

    /// Moves the rect by `(dx, dy)`.
    pub fn offset(&self, dx: f32, dy: f32) -> RectF {
        RectF::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Where the ribbon sits on a canvas and how it is turned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonPlacement {
    /// Canvas the placement was computed for.
    pub canvas: CanvasSize,

    pub corner: Corner,

    /// Unrotated ribbon footprint.
    pub footprint: RectF,
}

impl RibbonPlacement {
    pub fn new(canvas: CanvasSize, corner: Corner) -> Self {
        let width = canvas.width * RIBBON_WIDTH_FACTOR;
        let height = canvas.height * RIBBON_HEIGHT_FACTOR;
        let (sx, sy) = corner.direction();
        let dx = canvas.width * CORNER_OFFSET_FACTOR * sx;
        // raster y grows downward
        let dy = -canvas.height * CORNER_OFFSET_FACTOR * sy;

        let footprint = RectF::new(0.0, 0.0, canvas.width, canvas.height)
            .centered(width, height)
            .offset(dx, dy);

        Self {
            canvas,
            corner,
            footprint,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        self.footprint.center()
    }

    /// Offset of the ribbon center from the canvas center, y pointing up.
    pub fn center_offset(&self) -> (f32, f32) {
        let (cx, cy) = self.center();
        (cx - self.canvas.width * 0.5, self.canvas.height * 0.5 - cy)
    }

    /// Rotation about the ribbon center, shared by the ribbon and the text.
    pub fn transform(&self) -> Transform {
        let (cx, cy) = self.center();
        // tiny-skia angles turn clockwise on a y-down raster
        Transform::from_rotate_at(-self.corner.rotation_degrees(), cx, cy)
    }

    /// Largest text box that fits inside the ribbon.
    pub fn text_bounds(&self) -> (f32, f32) {
        let padding = self.canvas.width * TEXT_PADDING_FACTOR;
        (self.footprint.width - padding, self.footprint.height)
    }

    /// Font size the fit starts shrinking from.
    pub fn text_start_size(&self) -> f32 {
        self.canvas.width * TEXT_START_SIZE_FACTOR
    }
}
