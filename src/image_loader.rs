//! # Tile Image Decoding
//!
//! Turns a label PNG back into the planes a PDF image XObject wants: 8-bit
//! RGB samples, plus a DeviceGray plane for the SMask when any pixel is not
//! fully opaque.

use image::{DynamicImage, ImageFormat};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Sample planes of one decoded tile.
#[derive(Debug, Clone)]
pub struct DecodedTile {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes.
    pub rgb: Vec<u8>,
    /// `width * height` bytes. `None` when every pixel is opaque.
    pub alpha: Option<Vec<u8>>,
}

pub fn is_png(data: &[u8]) -> bool {
    data.starts_with(&PNG_SIGNATURE)
}

/// Decode PNG bytes into RGB and optional alpha planes.
pub fn decode_png(data: &[u8]) -> Result<DecodedTile, String> {
    if !is_png(data) {
        return Err("not a PNG file".to_string());
    }
    let img = image::load_from_memory_with_format(data, ImageFormat::Png)
        .map_err(|e| format!("corrupt PNG: {e}"))?;
    Ok(split_planes(img))
}

fn split_planes(img: DynamicImage) -> DecodedTile {
    let (width, height) = (img.width(), img.height());
    let alpha = if img.color().has_alpha() {
        let plane: Vec<u8> = img.to_rgba8().pixels().map(|p| p[3]).collect();
        plane.iter().any(|&a| a < u8::MAX).then_some(plane)
    } else {
        None
    };
    DecodedTile {
        width,
        height,
        rgb: img.to_rgb8().into_raw(),
        alpha,
    }
}
