//! # PDF Output
//!
//! Writes the assembled block flow as a PDF 1.7 file. A sheet of labels
//! needs very little of the format: a page tree, one content stream per
//! page, and one image XObject per placed tile.
//!
//! ```text
//! %PDF-1.7
//! 1 0 obj  Catalog
//! 2 0 obj  Pages  /Kids [...] /Count n
//! 3 0 obj  Image XObject (+ SMask when the tile has alpha)
//! ...      content stream, Page, next tile ...
//! n 0 obj  Info
//! xref / trailer / startxref
//! %%EOF
//! ```
//!
//! Tiles are positioned by walking the flow like a word processor: each row
//! starts at the left margin and each run moves the cursor right by its
//! width. A finished row moves the cursor down by its tallest run, and
//! vertical spacers add their height. A page break starts a new page at the
//! top margin.

use std::fmt::Write as _;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::assemble::{Block, DocumentContent, Run};
use crate::error::SheetError;
use crate::image_loader::{decode_png, DecodedTile};
use crate::model::twips_to_pt;

const CATALOG: usize = 1;
const PAGE_TREE: usize = 2;
const DEFLATE_LEVEL: u8 = 6;

/// A tile image at its final position, in twips from the page's top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage<'a> {
    pub label: &'a str,
    pub data: &'a [u8],
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Object bodies indexed by object number. Slot 0 is the free-list head.
struct ObjectTable {
    bodies: Vec<Vec<u8>>,
}

impl ObjectTable {
    fn new() -> Self {
        // free head, catalog, page tree
        Self {
            bodies: vec![Vec::new(); 3],
        }
    }

    fn add(&mut self, body: impl Into<Vec<u8>>) -> usize {
        self.bodies.push(body.into());
        self.bodies.len() - 1
    }

    fn set(&mut self, id: usize, body: impl Into<Vec<u8>>) {
        self.bodies[id] = body.into();
    }

    /// Add a Flate-compressed stream. `dict` holds the entries besides
    /// `/Length` and `/Filter`.
    fn add_stream(&mut self, dict: &str, raw: &[u8]) -> usize {
        let packed = compress_to_vec_zlib(raw, DEFLATE_LEVEL);
        let mut body = format!(
            "<< {dict} /Filter /FlateDecode /Length {} >>\nstream\n",
            packed.len()
        )
        .into_bytes();
        body.extend_from_slice(&packed);
        body.extend_from_slice(b"\nendstream");
        self.add(body)
    }

    fn finish(self, info: usize) -> Vec<u8> {
        let mut out = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n".to_vec();
        let mut offsets = Vec::with_capacity(self.bodies.len());
        for (id, body) in self.bodies.iter().enumerate().skip(1) {
            offsets.push(out.len());
            out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_at = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.bodies.len());
        for offset in offsets {
            let _ = write!(xref, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root {CATALOG} 0 R /Info {info} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            self.bodies.len()
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

#[derive(Debug, Default)]
pub struct PdfWriter;

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Serialize `doc`. Every tile's bytes must decode as PNG.
    pub fn write(&self, doc: &DocumentContent) -> Result<Vec<u8>, SheetError> {
        let mut table = ObjectTable::new();
        let media_box = format!(
            "[0 0 {:.2} {:.2}]",
            twips_to_pt(doc.page_width),
            twips_to_pt(doc.page_height)
        );
        let page_height = twips_to_pt(doc.page_height);

        let mut kids = Vec::new();
        for placements in place_images(doc) {
            let mut resources = String::new();
            for (n, placed) in placements.iter().enumerate() {
                let tile = decode_png(placed.data).map_err(|reason| SheetError::Decode {
                    label: placed.label.to_string(),
                    reason,
                })?;
                let id = add_image(&mut table, &tile);
                let _ = write!(resources, "/Im{n} {id} 0 R ");
            }

            let content = table.add_stream("", content_stream(&placements, page_height).as_bytes());
            let page = table.add(format!(
                "<< /Type /Page /Parent {PAGE_TREE} 0 R /MediaBox {media_box} \
                 /Resources << /XObject << {resources}>> >> /Contents {content} 0 R >>"
            ));
            kids.push(format!("{page} 0 R"));
        }

        table.set(CATALOG, format!("<< /Type /Catalog /Pages {PAGE_TREE} 0 R >>"));
        table.set(
            PAGE_TREE,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                kids.len()
            ),
        );

        let mut info = String::from("<< ");
        if let Some(title) = &doc.title {
            let _ = write!(info, "/Title ({}) ", escape_text(title));
        }
        let _ = write!(
            info,
            "/Producer (qrsheet {}) /Creator (qrsheet) >>",
            env!("CARGO_PKG_VERSION")
        );
        let info = table.add(info);

        Ok(table.finish(info))
    }
}

/// Add the tile as an RGB image XObject, with its alpha plane as SMask.
fn add_image(table: &mut ObjectTable, tile: &DecodedTile) -> usize {
    let header = |space: &str| {
        format!(
            "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {space} /BitsPerComponent 8",
            tile.width, tile.height
        )
    };
    let smask = tile
        .alpha
        .as_ref()
        .map(|alpha| table.add_stream(&header("/DeviceGray"), alpha));
    let mut dict = header("/DeviceRGB");
    if let Some(id) = smask {
        let _ = write!(dict, " /SMask {id} 0 R");
    }
    table.add_stream(&dict, &tile.rgb)
}

/// Paint operators for one page: each tile is `/ImN` scaled into its box.
/// PDF space has its origin at the bottom-left, so y is flipped.
fn content_stream(placements: &[PlacedImage<'_>], page_height: f64) -> String {
    let mut ops = String::new();
    for (n, p) in placements.iter().enumerate() {
        let w = twips_to_pt(p.width);
        let h = twips_to_pt(p.height);
        let x = twips_to_pt(p.x);
        let y = page_height - twips_to_pt(p.y) - h;
        let _ = write!(ops, "q\n{w:.4} 0 0 {h:.4} {x:.2} {y:.2} cm\n/Im{n} Do\nQ\n");
    }
    ops
}

/// Escape a literal string for use inside `( )`.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Walk the block flow and position every image run, page by page.
///
/// Placeholders and spacers only move the cursor. A document without blocks
/// has no pages.
pub fn place_images(doc: &DocumentContent) -> Vec<Vec<PlacedImage<'_>>> {
    if doc.blocks.is_empty() {
        return Vec::new();
    }

    let mut pages = vec![Vec::new()];
    let mut cursor_y = doc.margins.top;

    for block in &doc.blocks {
        match block {
            Block::Row(runs) => {
                let mut cursor_x = doc.margins.left;
                let mut row_height: f64 = 0.0;
                for run in runs {
                    if let Run::Image {
                        label,
                        data,
                        width,
                        height,
                        ..
                    } = run
                    {
                        if let Some(page) = pages.last_mut() {
                            page.push(PlacedImage {
                                label,
                                data,
                                x: cursor_x,
                                y: cursor_y,
                                width: *width,
                                height: *height,
                            });
                        }
                    }
                    cursor_x += run.width();
                    row_height = row_height.max(run.height());
                }
                cursor_y += row_height;
            }
            Block::VerticalSpacer { height } => cursor_y += height,
            Block::PageBreak => {
                pages.push(Vec::new());
                cursor_y = doc.margins.top;
            }
        }
    }

    pages
}
