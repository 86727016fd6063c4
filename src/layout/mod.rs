//! # Grid Layout Calculator
//!
//! Solves where fixed-size tiles go on a fixed-size page. The whole problem is
//! closed-form: subtract the margins, subtract the tiles, and share what is
//! left between the gaps the [`LayoutMode`] asks for.
//!
//! ```text
//!   Distributed (n + 1 gaps)        Between (n - 1 gaps)
//!  |  [ ]  [ ]  [ ]  [ ]  |        |[ ]   [ ]   [ ]   [ ]|
//! ```
//!
//! The solved spacing always satisfies
//! `columns * tile_width + gaps * horizontal_spacing == usable_width`
//! (and the same vertically), so tiles never spill into the margins.
//! Configurations that cannot satisfy it are errors, not clamps.

pub mod pages;

pub use pages::{page_count, page_range, paginate, slot_origin};

use std::fmt;

use thiserror::Error;

use crate::model::{GridSpec, LayoutMode, PageGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// A grid configuration that has no valid geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("{axis} margins ({margins} twips) leave no usable space on a {page} twip page")]
    MarginsExceedPage { axis: Axis, page: f64, margins: f64 },
    #[error("grid needs at least one column and one row (got {columns} x {rows})")]
    EmptyGrid { columns: usize, rows: usize },
    #[error("{axis} tiles and spacing need {needed:.0} twips but only {available:.0} are usable")]
    TilesOverflow {
        axis: Axis,
        needed: f64,
        available: f64,
    },
}

/// Solve the page geometry for a grid.
pub fn compute_geometry(spec: &GridSpec) -> Result<PageGeometry, LayoutError> {
    if spec.columns == 0 || spec.rows == 0 {
        return Err(LayoutError::EmptyGrid {
            columns: spec.columns,
            rows: spec.rows,
        });
    }

    let (page_width, page_height) = spec.page.dimensions();
    let usable_width = usable_extent(Axis::Horizontal, page_width, spec.margins.horizontal())?;
    let usable_height = usable_extent(Axis::Vertical, page_height, spec.margins.vertical())?;

    let original_width = spec.tile.width_twips();
    let original_height = spec.tile.height_twips();

    let (tile_width, tile_height, tile_scale) = match spec.mode {
        LayoutMode::Distributed => (original_width, original_height, 1.0),
        LayoutMode::Between { min_spacing } => {
            let max_width =
                max_track(Axis::Horizontal, usable_width, spec.columns, min_spacing)?;
            let max_height = max_track(Axis::Vertical, usable_height, spec.rows, min_spacing)?;
            let scale = fit_scale(max_width, max_height, original_width, original_height);
            // Whole pixels, rounded down so the scaled grid still fits.
            let per_px = spec.tile.twips_per_px;
            let width = (original_width * scale / per_px).floor() * per_px;
            let height = (original_height * scale / per_px).floor() * per_px;
            (width, height, scale)
        }
    };

    let horizontal_spacing = solve_spacing(
        Axis::Horizontal,
        spec.mode,
        usable_width,
        spec.columns,
        tile_width,
    )?;
    let vertical_spacing =
        solve_spacing(Axis::Vertical, spec.mode, usable_height, spec.rows, tile_height)?;

    Ok(PageGeometry {
        page_width,
        page_height,
        margins: spec.margins,
        columns: spec.columns,
        rows: spec.rows,
        tile_width,
        tile_height,
        tile_scale,
        horizontal_spacing,
        vertical_spacing,
        mode: spec.mode,
    })
}

/// Scale factor that fits an `original_width x original_height` box into
/// `max_width x max_height` while keeping its aspect ratio. Never upscales.
pub fn fit_scale(max_width: f64, max_height: f64, original_width: f64, original_height: f64) -> f64 {
    if original_width <= 0.0 || original_height <= 0.0 {
        return 1.0;
    }
    (max_width / original_width)
        .min(max_height / original_height)
        .min(1.0)
        .max(0.0)
}

fn usable_extent(axis: Axis, page: f64, margins: f64) -> Result<f64, LayoutError> {
    let usable = page - margins;
    if usable <= 0.0 {
        return Err(LayoutError::MarginsExceedPage {
            axis,
            page,
            margins,
        });
    }
    Ok(usable)
}

/// Largest tile extent per track when `min_spacing` must separate tracks.
fn max_track(axis: Axis, usable: f64, tracks: usize, min_spacing: f64) -> Result<f64, LayoutError> {
    let spacing = tracks.saturating_sub(1) as f64 * min_spacing;
    if spacing >= usable {
        return Err(LayoutError::TilesOverflow {
            axis,
            needed: spacing,
            available: usable,
        });
    }
    Ok((usable - spacing) / tracks as f64)
}

fn solve_spacing(
    axis: Axis,
    mode: LayoutMode,
    usable: f64,
    tracks: usize,
    tile: f64,
) -> Result<f64, LayoutError> {
    let occupied = tracks as f64 * tile;
    let leftover = usable - occupied;
    if leftover < 0.0 {
        return Err(LayoutError::TilesOverflow {
            axis,
            needed: occupied,
            available: usable,
        });
    }
    match mode.gap_count(tracks) {
        0 => Ok(0.0),
        gaps => Ok(leftover / gaps as f64),
    }
}
