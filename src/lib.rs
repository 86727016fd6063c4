//! # qrsheet
//!
//! Batch-generates labeled QR code images for a range of codes and tiles
//! them onto printable pages.
//!
//! The grid is solved once, up front, in twips. Every label image is written
//! to disk before the document is assembled, and the document is assembled
//! purely from those files, so the PNGs and the PDF always agree.
//!
//! ## Architecture
//!
//! ```text
//! RunRequest (code, start..=end)
//!       ↓
//!   [layout]     - Solve PageGeometry from a GridSpec
//!       ↓
//!   [compose]    - QR symbol + border + label band → PNG per code
//!       ↓
//!   [assemble]   - Pages of rows, spacers and placeholders
//!       ↓
//!   [pdf]        - Serialize to PDF bytes
//! ```

pub mod assemble;
pub mod compose;
pub mod config;
pub mod error;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod request;

use std::path::{Path, PathBuf};

use log::info;

use assemble::assemble;
use compose::logo::LogoLoad;
use compose::text::LabelFont;
use compose::LabelComposer;
use config::RunConfig;
use error::SheetError;
use layout::compute_geometry;
use model::{twips_to_px, LabelFile, PageGeometry, TWIPS_PER_INCH};
use pdf::PdfWriter;
use request::RunRequest;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub labels: Vec<LabelFile>,
    pub geometry: PageGeometry,
    pub page_count: usize,
    pub document_path: PathBuf,
}

/// Generate every label image and the tiled document.
///
/// The geometry is solved before anything touches the filesystem, so a bad
/// layout fails without side effects.
pub fn run(config: &RunConfig, request: &RunRequest) -> Result<RunReport, SheetError> {
    let geometry = compute_geometry(&config.preset.grid_spec())?;

    std::fs::create_dir_all(&config.output_dir).map_err(|source| SheetError::CreateDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let font = match &config.font_path {
        Some(path) => LabelFont::load(path)?,
        None => LabelFont::Builtin,
    };
    let composer = LabelComposer::new(
        config.preset.label_style(),
        LogoLoad::attempt(&config.logo_path),
        font,
    );

    let labels = generate_labels(&composer, request, &config.output_dir)?;

    let mut content = assemble(&labels, &geometry)?;
    content.title = Some(format!(
        "QR Codes {}-{} to {}-{}",
        request.code, request.start, request.code, request.end
    ));
    let bytes = PdfWriter::new().write(&content)?;

    let document_path = config.output_dir.join(&config.document_name);
    std::fs::write(&document_path, &bytes).map_err(|source| SheetError::WriteDocument {
        path: document_path.clone(),
        source,
    })?;

    let page_count = content.page_count();
    info!("Created {} with {} page(s)", document_path.display(), page_count);
    log_layout(&geometry, page_count);

    Ok(RunReport {
        labels,
        geometry,
        page_count,
        document_path,
    })
}

/// Compose and write `<text>.png` for every label in `request`, in order.
pub fn generate_labels(
    composer: &LabelComposer,
    request: &RunRequest,
    dir: &Path,
) -> Result<Vec<LabelFile>, SheetError> {
    let mut files = Vec::new();
    for text in request.labels() {
        let image = composer.compose(&text)?;
        let path = dir.join(format!("{text}.png"));
        std::fs::write(&path, &image.png).map_err(|source| SheetError::WriteImage {
            path: path.clone(),
            source,
        })?;
        info!("Generated: {}", path.display());
        files.push(LabelFile {
            text: image.text,
            path,
            width_px: image.width_px,
            height_px: image.height_px,
        });
    }
    Ok(files)
}

fn log_layout(g: &PageGeometry, pages: usize) {
    info!(
        "Layout: {:.1}\" x {:.1}\" page, {:.2}\" margins, {}x{} grid ({} per page), {} page(s)",
        g.page_width / TWIPS_PER_INCH,
        g.page_height / TWIPS_PER_INCH,
        g.margins.left / TWIPS_PER_INCH,
        g.columns,
        g.rows,
        g.per_page(),
        pages
    );
    info!(
        "Tiles: {:.0} x {:.0} twips ({:.1} x {:.1} px), scale {:.3}",
        g.tile_width,
        g.tile_height,
        twips_to_px(g.tile_width),
        twips_to_px(g.tile_height),
        g.tile_scale
    );
    info!(
        "Spacing: {:.1} twips horizontal, {:.1} twips vertical ({:?})",
        g.horizontal_spacing, g.vertical_spacing, g.mode
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::LabelStyle;

    #[test]
    fn test_huge_range_fails_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-created");
        let composer = LabelComposer::new(
            LabelStyle::compact(),
            LogoLoad::Unavailable("absent".into()),
            LabelFont::Builtin,
        );
        let request = RunRequest {
            code: "HP".to_string(),
            start: 0,
            end: i64::MAX / 2,
        };
        let err = generate_labels(&composer, &request, &missing).unwrap_err();
        match err {
            SheetError::WriteImage { path, .. } => assert!(path.ends_with("HP-0.png")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
