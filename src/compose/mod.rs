//! # Label Image Composer
//!
//! Builds one labeled PNG per code value:
//!
//! ```text
//! +------------------+
//! |  .------------.  |   rounded border around the QR area
//! |  |  QR symbol  |  |
//! |  '------------'  |
//! | .--------------. |   label band: logo + text, or centered text
//! | | [logo] HP-7  | |
//! | '--------------' |
//! +------------------+
//! ```
//!
//! Composition is deterministic for a given text, [`LabelStyle`], logo and
//! font. Writing the PNG somewhere is the caller's job.

pub mod logo;
pub mod qr;
pub mod shape;
pub mod text;

use image::{imageops, ColorType, ImageEncoder, Rgba, RgbaImage};
use log::warn;

use crate::error::SheetError;
use crate::model::{LabelImage, TileSize};

use self::logo::{scale_logo, LogoLoad};
use self::shape::{Rect, RoundedRect};
use self::text::LabelFont;

const fn rgb(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

pub const WHITE: Rgba<u8> = rgb(0xFF, 0xFF, 0xFF);
pub const BLACK: Rgba<u8> = rgb(0x00, 0x00, 0x00);

/// Fixed drawing constants for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub canvas_width: u32,
    pub canvas_height: u32,

    /// Square the QR symbol is centered in.
    pub qr_area: Rect,
    /// Gap between `qr_area` and the symbol on every side.
    pub qr_inset: f32,
    /// Light modules around the symbol.
    pub qr_quiet_zone: u32,

    pub border: Rect,
    pub border_radius: f32,
    pub border_width: f32,
    pub border_color: Rgba<u8>,

    pub band: Rect,
    pub band_radius: f32,
    /// Internal padding of the band; the logo box is `band.height - 2 * band_margin`.
    pub band_margin: f32,
    pub band_fill: Rgba<u8>,
    pub band_stroke: Rgba<u8>,
    pub band_stroke_width: f32,

    pub text_color: Rgba<u8>,
    /// Text height when a logo sits to its left.
    pub text_px_with_logo: f32,
    /// Text height when the text is centered alone.
    pub text_px_centered: f32,
    pub logo_text_gap: f32,
}

impl LabelStyle {
    /// 200x250 labels sized for a 4x4 grid.
    pub fn dense() -> Self {
        let border = Rect::new(20.0, 8.0, 160.0, 160.0);
        Self {
            canvas_width: 200,
            canvas_height: 250,
            qr_area: border,
            qr_inset: 3.0,
            qr_quiet_zone: 1,
            border,
            border_radius: 8.0,
            border_width: 2.0,
            border_color: rgb(0x33, 0x33, 0x33),
            band: Rect::new(15.0, 183.0, 170.0, 60.0),
            band_radius: 6.0,
            band_margin: 8.0,
            band_fill: rgb(0xF8, 0xF9, 0xFA),
            band_stroke: rgb(0x2C, 0x3E, 0x50),
            band_stroke_width: 1.5,
            text_color: rgb(0x2C, 0x3E, 0x50),
            text_px_with_logo: 20.0,
            text_px_centered: 24.0,
            logo_text_gap: 10.0,
        }
    }

    /// 256x316 labels with a border around the whole card, for a 4x2 grid.
    pub fn compact() -> Self {
        Self {
            canvas_width: 256,
            canvas_height: 316,
            qr_area: Rect::new(0.0, 0.0, 256.0, 256.0),
            qr_inset: 10.0,
            qr_quiet_zone: 0,
            border: Rect::new(2.0, 2.0, 252.0, 312.0),
            border_radius: 18.0,
            border_width: 4.0,
            border_color: BLACK,
            band: Rect::new(14.0, 258.0, 228.0, 46.0),
            band_radius: 8.0,
            band_margin: 6.0,
            band_fill: WHITE,
            band_stroke: WHITE,
            band_stroke_width: 0.0,
            text_color: BLACK,
            text_px_with_logo: 24.0,
            text_px_centered: 24.0,
            logo_text_gap: 10.0,
        }
    }

    pub fn tile_size(&self) -> TileSize {
        TileSize::new(self.canvas_width, self.canvas_height)
    }

    /// Side of the square box a logo is fitted into.
    pub fn logo_box(&self) -> f32 {
        (self.band.height - 2.0 * self.band_margin).max(1.0)
    }
}

/// Where the label text goes inside the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub x: f32,
    pub center_y: f32,
    pub px: f32,
    pub width: f32,
}

/// Composes label images from text. Holds the logo (already scaled to the
/// band) and the text face for the whole run.
#[derive(Debug)]
pub struct LabelComposer {
    style: LabelStyle,
    logo: LogoLoad,
    font: LabelFont,
}

impl LabelComposer {
    /// An unavailable logo is logged once here and never again per label.
    pub fn new(style: LabelStyle, logo: LogoLoad, font: LabelFont) -> Self {
        let logo = match logo {
            LogoLoad::Loaded(img) => LogoLoad::Loaded(scale_logo(&img, style.logo_box())),
            LogoLoad::Unavailable(reason) => {
                warn!("Logo not found or could not be loaded ({reason}); drawing text only.");
                LogoLoad::Unavailable(reason)
            }
        };
        Self { style, logo, font }
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_loaded()
    }

    /// Compose the label for `text` and PNG-encode it.
    pub fn compose(&self, text: &str) -> Result<LabelImage, SheetError> {
        let canvas = self.render(text)?;
        let (width, height) = canvas.dimensions();

        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png)
            .write_image(canvas.as_raw(), width, height, ColorType::Rgba8)
            .map_err(|source| SheetError::Encode {
                text: text.to_string(),
                source,
            })?;

        Ok(LabelImage {
            text: text.to_string(),
            width_px: width,
            height_px: height,
            png,
        })
    }

    /// Draw the label for `text` onto a fresh canvas.
    pub fn render(&self, text: &str) -> Result<RgbaImage, SheetError> {
        let s = &self.style;
        let mut canvas = RgbaImage::from_pixel(s.canvas_width, s.canvas_height, WHITE);

        RoundedRect::new(s.border, s.border_radius).stroke(&mut canvas, s.border_color, s.border_width);

        let target = s.qr_area.inset(s.qr_inset);
        let size = target.width.min(target.height).floor().max(1.0) as u32;
        let symbol = qr::qr_bitmap(text, size, s.qr_quiet_zone, BLACK, WHITE)?;
        let qr_x = (s.qr_area.center_x() - size as f32 / 2.0).round() as i64;
        let qr_y = (s.qr_area.center_y() - size as f32 / 2.0).round() as i64;
        imageops::replace(&mut canvas, &symbol, qr_x, qr_y);

        let band = RoundedRect::new(s.band, s.band_radius);
        band.fill(&mut canvas, s.band_fill);
        band.stroke(&mut canvas, s.band_stroke, s.band_stroke_width);

        self.draw_band_content(&mut canvas, text);
        Ok(canvas)
    }

    /// Text position for `text`, depending on whether a logo is present.
    pub fn text_placement(&self, text: &str) -> TextPlacement {
        let s = &self.style;
        let center_y = s.band.center_y();
        match &self.logo {
            LogoLoad::Loaded(logo) => {
                let px = s.text_px_with_logo;
                TextPlacement {
                    x: s.band.x + s.band_margin + logo.width() as f32 + s.logo_text_gap,
                    center_y,
                    px,
                    width: self.font.measure(text, px),
                }
            }
            LogoLoad::Unavailable(_) => {
                let px = s.text_px_centered;
                let width = self.font.measure(text, px);
                TextPlacement {
                    x: s.canvas_width as f32 / 2.0 - width / 2.0,
                    center_y,
                    px,
                    width,
                }
            }
        }
    }

    fn draw_band_content(&self, canvas: &mut RgbaImage, text: &str) {
        let s = &self.style;
        if let LogoLoad::Loaded(logo) = &self.logo {
            let x = (s.band.x + s.band_margin).round() as i64;
            let y = (s.band.center_y() - logo.height() as f32 / 2.0).round() as i64;
            imageops::overlay(canvas, logo, x, y);
        }
        let placement = self.text_placement(text);
        self.font.draw(
            canvas,
            text,
            placement.x,
            placement.center_y,
            placement.px,
            s.text_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer(logo: LogoLoad) -> LabelComposer {
        LabelComposer::new(LabelStyle::dense(), logo, LabelFont::Builtin)
    }

    fn test_logo() -> LogoLoad {
        LogoLoad::Loaded(RgbaImage::from_pixel(80, 40, Rgba([200, 30, 30, 255])))
    }

    #[test]
    fn test_compose_produces_png_of_canvas_size() {
        let label = composer(LogoLoad::Unavailable("absent".into()))
            .compose("HP-7")
            .unwrap();
        assert_eq!(label.text, "HP-7");
        assert_eq!((label.width_px, label.height_px), (200, 250));
        assert!(label.png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_fallback_text_is_centered() {
        let c = composer(LogoLoad::Unavailable("absent".into()));
        let p = c.text_placement("AB-9");
        assert_eq!(p.px, 24.0);
        let left_gap = p.x;
        let right_gap = 200.0 - (p.x + p.width);
        assert!((left_gap - right_gap).abs() < 1e-3);
        assert_eq!(p.center_y, 213.0);
    }

    #[test]
    fn test_logo_pushes_text_right() {
        let c = composer(test_logo());
        assert!(c.has_logo());
        let p = c.text_placement("AB-9");
        // logo box 60 - 16 = 44, landscape 2:1 → 44 x 22
        assert_eq!(p.x, 15.0 + 8.0 + 44.0 + 10.0);
        assert_eq!(p.px, 20.0);
    }

    #[test]
    fn test_logo_is_drawn_left_in_band() {
        let c = composer(test_logo());
        let canvas = c.render("HP-1").unwrap();
        // logo spans x 23..67, y 202..224
        let p = canvas.get_pixel(30, 213);
        assert!(p[0] > 150 && p[1] < 80 && p[2] < 80, "{p:?}");
    }

    #[test]
    fn test_background_and_qr_area() {
        let c = composer(LogoLoad::Unavailable("absent".into()));
        let canvas = c.render("HP-1").unwrap();
        assert_eq!(*canvas.get_pixel(2, 2), WHITE);
        // quiet zone just inside the border inset
        assert_eq!(*canvas.get_pixel(24, 12), WHITE);
        let dark = canvas
            .enumerate_pixels()
            .filter(|(x, y, p)| (23..177).contains(x) && (11..165).contains(y) && **p == BLACK)
            .count();
        assert!(dark > 1000);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let c = composer(LogoLoad::Unavailable("absent".into()));
        assert_eq!(c.compose("HP-3").unwrap().png, c.compose("HP-3").unwrap().png);
    }

    #[test]
    fn test_compact_style_fits_canvas() {
        let s = LabelStyle::compact();
        assert!(s.band.bottom() <= s.border.bottom());
        assert!(s.border.right() <= s.canvas_width as f32);
        let c = LabelComposer::new(s, LogoLoad::Unavailable("absent".into()), LabelFont::Builtin);
        let label = c.compose("HP-20").unwrap();
        assert_eq!((label.width_px, label.height_px), (256, 316));
    }
}
