//! QR symbol bitmaps.

use image::{Rgba, RgbaImage};
use qrcode::{Color, QrCode};

use crate::error::SheetError;

/// Encode `text` as a QR symbol filling exactly `size x size` pixels,
/// including `quiet_zone` light modules on every side.
///
/// Modules are mapped to pixels by nearest neighbour, so module edges may
/// differ by one pixel when `size` is not a multiple of the module count.
pub fn qr_bitmap(
    text: &str,
    size: u32,
    quiet_zone: u32,
    dark: Rgba<u8>,
    light: Rgba<u8>,
) -> Result<RgbaImage, SheetError> {
    let code = QrCode::new(text.as_bytes()).map_err(|e| SheetError::Qr {
        text: text.to_string(),
        reason: e.to_string(),
    })?;
    let modules = code.width() as u64;
    let colors = code.to_colors();
    let total = modules + 2 * quiet_zone as u64;
    let size = size.max(1);

    Ok(RgbaImage::from_fn(size, size, |x, y| {
        let mx = (x as u64 * total / size as u64) as i64 - quiet_zone as i64;
        let my = (y as u64 * total / size as u64) as i64 - quiet_zone as i64;
        let inside = mx >= 0 && my >= 0 && (mx as u64) < modules && (my as u64) < modules;
        if inside && colors[(my as u64 * modules + mx as u64) as usize] == Color::Dark {
            dark
        } else {
            light
        }
    }))
}
