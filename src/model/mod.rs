//! # Sheet Model
//!
//! The types shared by every stage of the pipeline: page sizes and margins,
//! the tile grid description, the solved [`PageGeometry`], pages of slots, and
//! the label artifacts produced by the composer.
//!
//! All page-level lengths are in **twips** (1/1440 inch). Raster sizes are in
//! pixels and convert to twips at 15 twips per pixel (96 DPI) unless a
//! [`TileSize`] says otherwise.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const TWIPS_PER_INCH: f64 = 1440.0;
pub const TWIPS_PER_PX: f64 = 15.0;
pub const TWIPS_PER_PT: f64 = 20.0;

/// Convert inches to whole twips.
pub fn inches(v: f64) -> f64 {
    (v * TWIPS_PER_INCH).round()
}

pub fn px_to_twips(px: f64) -> f64 {
    px * TWIPS_PER_PX
}

pub fn twips_to_px(twips: f64) -> f64 {
    twips / TWIPS_PER_PX
}

pub fn twips_to_pt(twips: f64) -> f64 {
    twips / TWIPS_PER_PT
}

/// Standard page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    Letter,
    Legal,
    A4,
    /// Explicit size in twips.
    Custom { width: f64, height: f64 },
}

impl PageSize {
    /// Returns (width, height) in twips, portrait orientation.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::Letter => (12240.0, 15840.0),
            PageSize::Legal => (12240.0, 20160.0),
            PageSize::A4 => (11906.0, 16838.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Page margins in twips.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Pixel dimensions of one generated label image and the density it is
/// placed at on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSize {
    pub width_px: u32,
    pub height_px: u32,
    /// Defaults to [`TWIPS_PER_PX`] (96 DPI).
    pub twips_per_px: f64,
}

impl TileSize {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
            twips_per_px: TWIPS_PER_PX,
        }
    }

    /// Place the raster at `dpi` instead of the 96 DPI default.
    pub fn at_dpi(self, dpi: f64) -> Self {
        Self {
            twips_per_px: TWIPS_PER_INCH / dpi,
            ..self
        }
    }

    pub fn width_twips(&self) -> f64 {
        self.width_px as f64 * self.twips_per_px
    }

    pub fn height_twips(&self) -> f64 {
        self.height_px as f64 * self.twips_per_px
    }
}

/// How leftover space on an axis is turned into spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutMode {
    /// Gaps only between tiles; the grid touches the margins. Tiles are
    /// scaled down (never up) so that at least `min_spacing` twips fit
    /// between neighbours.
    #[serde(rename_all = "camelCase")]
    Between { min_spacing: f64 },
    /// Leftover space split evenly into `n + 1` gaps, so the first and last
    /// tile are padded from the margins as well.
    Distributed,
}

impl LayoutMode {
    /// Number of gaps on an axis holding `tracks` tiles.
    pub fn gap_count(&self, tracks: usize) -> usize {
        match self {
            LayoutMode::Between { .. } => tracks.saturating_sub(1),
            LayoutMode::Distributed => tracks + 1,
        }
    }

    /// Whether a gap precedes the first tile on each axis.
    pub fn has_edge_gaps(&self) -> bool {
        matches!(self, LayoutMode::Distributed)
    }
}

/// Everything the grid calculator needs to solve a [`PageGeometry`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub page: PageSize,
    pub margins: Margins,
    pub columns: usize,
    pub rows: usize,
    pub tile: TileSize,
    pub mode: LayoutMode,
}

/// The solved page layout, computed once per run.
///
/// `tile_width`/`tile_height` are the placed size in twips, which equals the
/// raster size unless `Between` mode had to scale tiles down (`tile_scale`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margins: Margins,
    pub columns: usize,
    pub rows: usize,
    pub tile_width: f64,
    pub tile_height: f64,
    pub tile_scale: f64,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub mode: LayoutMode,
}

impl PageGeometry {
    pub fn usable_width(&self) -> f64 {
        self.page_width - self.margins.horizontal()
    }

    pub fn usable_height(&self) -> f64 {
        self.page_height - self.margins.vertical()
    }

    pub fn per_page(&self) -> usize {
        self.columns * self.rows
    }

    pub fn total_horizontal_spacing(&self) -> f64 {
        self.mode.gap_count(self.columns) as f64 * self.horizontal_spacing
    }

    pub fn total_vertical_spacing(&self) -> f64 {
        self.mode.gap_count(self.rows) as f64 * self.vertical_spacing
    }
}

/// One grid position on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Index into the ordered label sequence.
    Tile(usize),
    Placeholder,
}

/// A page of exactly `columns * rows` slots in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub slots: Vec<Slot>,
}

impl Page {
    pub fn real_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Tile(_)))
            .count()
    }

    pub fn placeholder_count(&self) -> usize {
        self.slots.len() - self.real_count()
    }
}

/// One composed label, PNG-encoded. Never mutated after composition.
#[derive(Debug, Clone)]
pub struct LabelImage {
    pub text: String,
    pub width_px: u32,
    pub height_px: u32,
    pub png: Vec<u8>,
}

/// A label image after it has been written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFile {
    pub text: String,
    pub path: PathBuf,
    pub width_px: u32,
    pub height_px: u32,
}
