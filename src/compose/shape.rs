//! Rounded rectangles on an RGBA surface.
//!
//! Shapes are rasterized from a signed distance to the outline, which gives
//! anti-aliased fills and strokes without a path tessellator.

use image::{Rgba, RgbaImage};

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink by `by` on every side.
    pub fn inset(&self, by: f32) -> Rect {
        Rect {
            x: self.x + by,
            y: self.y + by,
            width: (self.width - 2.0 * by).max(0.0),
            height: (self.height - 2.0 * by).max(0.0),
        }
    }
}

/// A rectangle with equal corner radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    rect: Rect,
    radius: f32,
}

impl RoundedRect {
    /// The radius is clamped to half the smaller side so opposite arcs never
    /// overlap.
    pub fn new(rect: Rect, radius: f32) -> Self {
        let radius = radius
            .min(rect.width / 2.0)
            .min(rect.height / 2.0)
            .max(0.0);
        Self { rect, radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Signed distance from a point to the outline; negative inside.
    pub fn signed_distance(&self, px: f32, py: f32) -> f32 {
        let r = self.radius;
        let qx = (px - self.rect.center_x()).abs() - (self.rect.width / 2.0 - r);
        let qy = (py - self.rect.center_y()).abs() - (self.rect.height / 2.0 - r);
        let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
        let inside = qx.max(qy).min(0.0);
        outside + inside - r
    }

    pub fn fill(&self, canvas: &mut RgbaImage, color: Rgba<u8>) {
        self.paint(canvas, color, 1.0, |d| (0.5 - d).clamp(0.0, 1.0));
    }

    /// Stroke centered on the outline.
    pub fn stroke(&self, canvas: &mut RgbaImage, color: Rgba<u8>, line_width: f32) {
        if line_width <= 0.0 {
            return;
        }
        let half = line_width / 2.0;
        self.paint(canvas, color, half + 1.0, |d| {
            (half + 0.5 - d.abs()).clamp(0.0, 1.0)
        });
    }

    fn paint(
        &self,
        canvas: &mut RgbaImage,
        color: Rgba<u8>,
        pad: f32,
        coverage: impl Fn(f32) -> f32,
    ) {
        let (w, h) = canvas.dimensions();
        let x0 = (self.rect.x - pad).floor().max(0.0) as u32;
        let y0 = (self.rect.y - pad).floor().max(0.0) as u32;
        let x1 = ((self.rect.right() + pad).ceil().max(0.0) as u32).min(w);
        let y1 = ((self.rect.bottom() + pad).ceil().max(0.0) as u32).min(h);

        for y in y0..y1 {
            for x in x0..x1 {
                let d = self.signed_distance(x as f32 + 0.5, y as f32 + 0.5);
                let c = coverage(d);
                if c > 0.0 {
                    blend(canvas, x as i64, y as i64, color, c);
                }
            }
        }
    }
}

/// Source-over blend of `color` at `coverage` (0..=1). Out-of-bounds writes
/// are ignored.
pub fn blend(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0) * color[3] as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    for i in 0..3 {
        let mixed = dst[i] as f32 * (1.0 - alpha) + color[i] as f32 * alpha;
        dst[i] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    let out_alpha = dst[3] as f32 / 255.0 + alpha * (1.0 - dst[3] as f32 / 255.0);
    dst[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}
