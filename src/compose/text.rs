//! Label text rendering.
//!
//! Two faces: the built-in 8x8 bitmap face (always available, scaled by
//! whole pixels), or a TrueType face loaded from disk.

use std::fmt;
use std::path::Path;

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

use crate::compose::shape::blend;
use crate::error::SheetError;

const CELL: u32 = 8;

pub enum LabelFont {
    Builtin,
    TrueType(Font<'static>),
}

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFont::Builtin => write!(f, "Builtin"),
            LabelFont::TrueType(_) => write!(f, "TrueType(..)"),
        }
    }
}

impl LabelFont {
    /// Load a TrueType/OpenType face from `path`.
    pub fn load(path: &Path) -> Result<Self, SheetError> {
        let data = std::fs::read(path).map_err(|e| SheetError::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let font = Font::try_from_vec(data).ok_or_else(|| SheetError::Font {
            path: path.to_path_buf(),
            reason: "not a TrueType or OpenType font".to_string(),
        })?;
        Ok(LabelFont::TrueType(font))
    }

    /// Advance width of `text` at a nominal pixel height.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        match self {
            LabelFont::Builtin => (text.chars().count() as u32 * CELL * cell_scale(px)) as f32,
            LabelFont::TrueType(font) => font
                .layout(text, Scale::uniform(px), point(0.0, 0.0))
                .last()
                .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                .unwrap_or(0.0),
        }
    }

    /// Draw `text` starting at `x`, vertically centered on `center_y`.
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: f32,
        center_y: f32,
        px: f32,
        color: Rgba<u8>,
    ) {
        match self {
            LabelFont::Builtin => draw_bitmap(canvas, text, x, center_y, px, color),
            LabelFont::TrueType(font) => {
                let scale = Scale::uniform(px);
                let v = font.v_metrics(scale);
                let baseline = center_y + (v.ascent + v.descent) / 2.0;
                for glyph in font.layout(text, scale, point(x, baseline)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, coverage| {
                            blend(
                                canvas,
                                bb.min.x as i64 + gx as i64,
                                bb.min.y as i64 + gy as i64,
                                color,
                                coverage,
                            );
                        });
                    }
                }
            }
        }
    }
}

/// Whole-pixel magnification of the 8x8 cell for a nominal height.
fn cell_scale(px: f32) -> u32 {
    ((px / CELL as f32).floor() as u32).max(1)
}

fn draw_bitmap(canvas: &mut RgbaImage, text: &str, x: f32, center_y: f32, px: f32, color: Rgba<u8>) {
    let scale = cell_scale(px);
    let left = x.round() as i64;
    let top = (center_y - (CELL * scale) as f32 / 2.0).round() as i64;
    let advance = (CELL * scale) as i64;

    for (i, ch) in text.chars().enumerate() {
        // Unknown characters keep their cell but draw nothing.
        let Some(rows) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let origin_x = left + i as i64 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..CELL {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        blend(
                            canvas,
                            origin_x + (col * scale + dx) as i64,
                            top + (row as u32 * scale + dy) as i64,
                            color,
                            1.0,
                        );
                    }
                }
            }
        }
    }
}
