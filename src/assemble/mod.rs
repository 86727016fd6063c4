//! # Document Assembler
//!
//! Turns the ordered label files and the solved geometry into a flat flow of
//! blocks, the way a word processor sees a page of inline images:
//!
//! ```text
//! VerticalSpacer          (Distributed only)
//! Row [Spacer Image Spacer Image Spacer ... ]
//! VerticalSpacer
//! Row [ ... Placeholder Spacer Placeholder ... ]
//! PageBreak
//! ...
//! ```
//!
//! Spacers and placeholders carry no content; they only reserve space so
//! every page keeps the full grid shape. Image bytes are read from disk here,
//! and any unreadable file fails the whole assembly.

use std::path::PathBuf;

use log::debug;

use crate::error::SheetError;
use crate::layout::paginate;
use crate::model::{LabelFile, Margins, PageGeometry, Slot};

/// One inline element of a row. Lengths in twips.
#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    Image {
        label: String,
        path: PathBuf,
        data: Vec<u8>,
        width: f64,
        height: f64,
    },
    /// An empty grid slot with the same declared size as a tile.
    Placeholder { width: f64, height: f64 },
    Spacer { width: f64, height: f64 },
}

impl Run {
    pub fn width(&self) -> f64 {
        match self {
            Run::Image { width, .. } | Run::Placeholder { width, .. } | Run::Spacer { width, .. } => {
                *width
            }
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            Run::Image { height, .. }
            | Run::Placeholder { height, .. }
            | Run::Spacer { height, .. } => *height,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Row(Vec<Run>),
    VerticalSpacer { height: f64 },
    PageBreak,
}

/// The assembled document, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentContent {
    pub page_width: f64,
    pub page_height: f64,
    pub margins: Margins,
    pub title: Option<String>,
    pub blocks: Vec<Block>,
}

impl DocumentContent {
    pub fn page_count(&self) -> usize {
        if self.blocks.is_empty() {
            return 0;
        }
        1 + self
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::PageBreak))
            .count()
    }

    /// All image runs in document order.
    pub fn images(&self) -> impl Iterator<Item = &Run> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Row(runs) => Some(runs.iter()),
                _ => None,
            })
            .flatten()
            .filter(|r| matches!(r, Run::Image { .. }))
    }
}

/// Lay the labels out on pages according to `geometry`.
pub fn assemble(labels: &[LabelFile], geometry: &PageGeometry) -> Result<DocumentContent, SheetError> {
    let pages = paginate(labels.len(), geometry);
    let mut blocks = Vec::new();
    let edge_gaps = geometry.mode.has_edge_gaps();

    for page in &pages {
        for (row_idx, row) in page.slots.chunks(geometry.columns).enumerate() {
            if row_idx > 0 || edge_gaps {
                blocks.push(Block::VerticalSpacer {
                    height: geometry.vertical_spacing,
                });
            }

            let mut runs = Vec::with_capacity(row.len() * 2 + 1);
            if edge_gaps {
                runs.push(spacer(geometry));
            }
            for (col_idx, slot) in row.iter().enumerate() {
                runs.push(tile_run(slot, labels, geometry)?);
                if edge_gaps || col_idx + 1 < row.len() {
                    runs.push(spacer(geometry));
                }
            }
            blocks.push(Block::Row(runs));
        }

        debug!(
            "Assembled page {} ({} labels, {} placeholders)",
            page.index + 1,
            page.real_count(),
            page.placeholder_count()
        );

        if page.index + 1 < pages.len() {
            blocks.push(Block::PageBreak);
        }
    }

    Ok(DocumentContent {
        page_width: geometry.page_width,
        page_height: geometry.page_height,
        margins: geometry.margins,
        title: None,
        blocks,
    })
}

fn spacer(geometry: &PageGeometry) -> Run {
    Run::Spacer {
        width: geometry.horizontal_spacing,
        height: 0.0,
    }
}

fn tile_run(slot: &Slot, labels: &[LabelFile], geometry: &PageGeometry) -> Result<Run, SheetError> {
    match *slot {
        Slot::Tile(index) => {
            let label = &labels[index];
            let data = std::fs::read(&label.path).map_err(|source| SheetError::ReadImage {
                path: label.path.clone(),
                source,
            })?;
            Ok(Run::Image {
                label: label.text.clone(),
                path: label.path.clone(),
                data,
                width: geometry.tile_width,
                height: geometry.tile_height,
            })
        }
        Slot::Placeholder => Ok(Run::Placeholder {
            width: geometry.tile_width,
            height: geometry.tile_height,
        }),
    }
}
