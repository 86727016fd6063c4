//! # Pagination
//!
//! Slices the ordered label sequence into fixed-size pages and locates each
//! slot on the page. Pages are filled row-major; the last page is padded
//! with placeholders so every page keeps the full grid shape.

use std::ops::Range;

use crate::model::{Page, PageGeometry, Slot};

/// Number of pages needed for `total` items at `per_page` items each.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Half-open index range of the items on page `page`.
pub fn page_range(page: usize, per_page: usize, total: usize) -> Range<usize> {
    let start = (page * per_page).min(total);
    let end = ((page + 1) * per_page).min(total);
    start..end
}

/// Split `total` items into pages of the geometry's grid.
pub fn paginate(total: usize, geometry: &PageGeometry) -> Vec<Page> {
    let per_page = geometry.per_page();
    (0..page_count(total, per_page))
        .map(|index| {
            let range = page_range(index, per_page, total);
            let mut slots: Vec<Slot> = range.map(Slot::Tile).collect();
            slots.resize(per_page, Slot::Placeholder);
            Page { index, slots }
        })
        .collect()
}

/// Top-left corner of the slot at (`row`, `col`), in twips from the page's
/// top-left corner.
pub fn slot_origin(geometry: &PageGeometry, row: usize, col: usize) -> (f64, f64) {
    let edge = if geometry.mode.has_edge_gaps() { 1.0 } else { 0.0 };
    let x = geometry.margins.left
        + edge * geometry.horizontal_spacing
        + col as f64 * (geometry.tile_width + geometry.horizontal_spacing);
    let y = geometry.margins.top
        + edge * geometry.vertical_spacing
        + row as f64 * (geometry.tile_height + geometry.vertical_spacing);
    (x, y)
}
