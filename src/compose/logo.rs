//! Optional logo asset.
//!
//! The logo is a capability, not a requirement: a load attempt produces
//! either a usable image or the reason it is unavailable, and the composer
//! picks a layout from that.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;

#[derive(Debug, Clone)]
pub enum LogoLoad {
    Loaded(RgbaImage),
    Unavailable(String),
}

impl LogoLoad {
    /// Try to read and decode the logo at `path`.
    pub fn attempt(path: &Path) -> Self {
        match image::open(path) {
            Ok(img) => LogoLoad::Loaded(img.to_rgba8()),
            Err(e) => LogoLoad::Unavailable(format!("{}: {}", path.display(), e)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LogoLoad::Loaded(_))
    }
}

/// Fit a `width x height` logo into a `max x max` box without distortion.
///
/// The dominant axis is pinned to `max` and the other follows the aspect
/// ratio.
pub fn fit_logo(width: u32, height: u32, max: f32) -> (f32, f32) {
    if width == 0 || height == 0 {
        return (0.0, 0.0);
    }
    let aspect = width as f32 / height as f32;
    if aspect > 1.0 {
        (max, max / aspect)
    } else {
        (max * aspect, max)
    }
}

/// Resample `logo` to fit a `max x max` box.
pub fn scale_logo(logo: &RgbaImage, max: f32) -> RgbaImage {
    let (w, h) = fit_logo(logo.width(), logo.height(), max);
    let w = (w.round() as u32).max(1);
    let h = (h.round() as u32).max(1);
    imageops::resize(logo, w, h, FilterType::Triangle)
}
