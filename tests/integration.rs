//! Integration tests for the qrsheet pipeline.
//!
//! These tests exercise the full path from a code range to PNGs and a PDF
//! on disk. They verify:
//! - One image per code, named and ordered by number
//! - The document has the expected number of pages and placed images
//! - Tiles land exactly on their grid slots
//! - A missing logo never fails a run
//! - Geometry and pagination invariants hold across grids

use std::path::Path;

use proptest::prelude::*;

use qrsheet::assemble::{assemble, Run};
use qrsheet::config::{LayoutPreset, RunConfig};
use qrsheet::error::SheetError;
use qrsheet::layout::{compute_geometry, page_count, paginate, slot_origin, LayoutError};
use qrsheet::model::{GridSpec, LayoutMode, Margins, PageGeometry, PageSize, TileSize};
use qrsheet::pdf::place_images;
use qrsheet::request::RunRequest;

// ─── Helpers ────────────────────────────────────────────────────

fn config_in(dir: &Path, preset: LayoutPreset) -> RunConfig {
    RunConfig {
        output_dir: dir.join("qr-codes"),
        document_name: "QR_Codes.pdf".into(),
        logo_path: dir.join("logo.png"),
        font_path: None,
        preset,
    }
}

fn request(code: &str, start: &str, end: &str) -> RunRequest {
    RunRequest::resolve(Some(code), Some(start), Some(end))
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(bytes.ends_with(b"%%EOF\n"), "Missing EOF marker");
    assert_eq!(count_occurrences(bytes, b"startxref"), 1);
    assert!(count_occurrences(bytes, b"/Type /Catalog") == 1);
}

// ─── Pipeline Tests ─────────────────────────────────────────────

#[test]
fn test_nine_labels_on_compact_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), LayoutPreset::Compact);
    let report = qrsheet::run(&config, &request("AB", "1", "9")).unwrap();

    assert_eq!(report.labels.len(), 9);
    assert_eq!(report.page_count, 2);
    for (i, label) in report.labels.iter().enumerate() {
        assert_eq!(label.text, format!("AB-{}", i + 1));
        assert!(label.path.exists(), "{} was not written", label.path.display());
        assert_eq!(label.path.file_name().unwrap(), format!("AB-{}.png", i + 1).as_str());
    }

    let bytes = std::fs::read(&report.document_path).unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(count_occurrences(&bytes, b"/Type /Page /Parent"), 2);
    assert_eq!(count_occurrences(&bytes, b"/Subtype /Image"), 9);
    assert_eq!(count_occurrences(&bytes, b"/Count 2"), 1);
}

#[test]
fn test_document_is_written_beside_the_images() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), LayoutPreset::Compact);
    assert_eq!(config.document_name, RunConfig::default().document_name);

    let report = qrsheet::run(&config, &request("AB", "1", "2")).unwrap();
    let expected = dir.path().join("qr-codes").join("QR_Codes.pdf");
    assert_eq!(report.document_path, expected);
    assert!(expected.exists());
    assert!(!dir.path().join("QR_Codes.pdf").exists());
}

#[test]
fn test_assembled_images_point_at_written_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), LayoutPreset::Dense);
    let report = qrsheet::run(&config, &request("RT", "1", "5")).unwrap();
    let content = assemble(&report.labels, &report.geometry).unwrap();

    let mut paths = Vec::new();
    for run in content.images() {
        if let Run::Image { path, data, .. } = run {
            assert!(path.exists(), "{} missing", path.display());
            assert_eq!(&std::fs::read(path).unwrap(), data);
            paths.push(path.clone());
        }
    }
    let written: Vec<_> = report.labels.iter().map(|l| l.path.clone()).collect();
    assert_eq!(paths, written);
}

#[test]
fn test_dense_sheet_holds_sixteen() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), LayoutPreset::Dense);

    let report = qrsheet::run(&config, &request("HP", "1", "16")).unwrap();
    assert_eq!(report.page_count, 1);

    let report = qrsheet::run(&config, &request("HP", "1", "17")).unwrap();
    assert_eq!(report.page_count, 2);
}

#[test]
fn test_swapped_range_matches_ascending() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), LayoutPreset::Compact);

    let forward = qrsheet::run(&config, &request("AB", "1", "3")).unwrap();
    let reversed = qrsheet::run(&config, &request("AB", "3", "1")).unwrap();
    let texts = |r: &qrsheet::RunReport| r.labels.iter().map(|l| l.text.clone()).collect::<Vec<_>>();
    assert_eq!(texts(&forward), texts(&reversed));
    assert_eq!(texts(&forward), vec!["AB-1", "AB-2", "AB-3"]);
}

#[test]
fn test_blank_code_defaults_to_hp() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), LayoutPreset::Compact);
    let report = qrsheet::run(&config, &request("", "1", "2")).unwrap();
    assert!(report.labels.iter().all(|l| l.text.starts_with("HP-")));
    assert!(dir.path().join("qr-codes/HP-2.png").exists());
}

#[test]
fn test_logo_present_and_absent_both_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), LayoutPreset::Dense);
    assert!(!config.logo_path.exists());
    qrsheet::run(&config, &request("HP", "1", "1")).unwrap();

    image::RgbaImage::from_pixel(64, 32, image::Rgba([10, 120, 200, 255]))
        .save(&config.logo_path)
        .unwrap();
    let report = qrsheet::run(&config, &request("HP", "1", "1")).unwrap();
    assert_eq!(report.labels.len(), 1);
}

#[test]
fn test_unreadable_font_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), LayoutPreset::Dense);
    let font = dir.path().join("broken.ttf");
    std::fs::write(&font, b"not a font").unwrap();
    config.font_path = Some(font);
    let err = qrsheet::run(&config, &request("HP", "1", "1")).unwrap_err();
    assert!(matches!(err, SheetError::Font { .. }));
}

#[test]
fn test_output_dir_blocked_by_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), LayoutPreset::Dense);
    let blocker = dir.path().join("taken");
    std::fs::write(&blocker, b"").unwrap();
    config.output_dir = blocker.join("qr-codes");
    let err = qrsheet::run(&config, &request("HP", "1", "1")).unwrap_err();
    assert!(matches!(err, SheetError::CreateDir { .. }));
}

// ─── Placement Tests ────────────────────────────────────────────

#[test]
fn test_images_land_on_slot_origins() {
    let dir = tempfile::tempdir().unwrap();
    for preset in [LayoutPreset::Dense, LayoutPreset::Compact] {
        let config = config_in(dir.path(), preset);
        let report = qrsheet::run(&config, &request("PL", "1", "11")).unwrap();
        let content = assemble(&report.labels, &report.geometry).unwrap();
        let g = report.geometry;

        let mut seen = 0;
        for page in place_images(&content) {
            for (slot, placed) in page.iter().enumerate() {
                let (x, y) = slot_origin(&g, slot / g.columns, slot % g.columns);
                assert!((placed.x - x).abs() < 1e-6, "{preset:?} slot {slot}: x {} vs {x}", placed.x);
                assert!((placed.y - y).abs() < 1e-6, "{preset:?} slot {slot}: y {} vs {y}", placed.y);
                assert!(placed.x + placed.width <= g.page_width - g.margins.right + 1e-6);
                assert!(placed.y + placed.height <= g.page_height - g.margins.bottom + 1e-6);
                seen += 1;
            }
        }
        assert_eq!(seen, 11);
    }
}

#[test]
fn test_margins_exceeding_page_fail_before_writing() {
    let spec = GridSpec {
        page: PageSize::Letter,
        margins: Margins::uniform(7000.0),
        columns: 4,
        rows: 2,
        tile: TileSize::new(256, 316),
        mode: LayoutMode::Distributed,
    };
    assert!(matches!(
        compute_geometry(&spec),
        Err(LayoutError::MarginsExceedPage { .. })
    ));
}

// ─── Properties ─────────────────────────────────────────────────

fn assert_fills_usable_extent(g: &PageGeometry) -> Result<(), TestCaseError> {
    let across = g.columns as f64 * g.tile_width + g.total_horizontal_spacing();
    let down = g.rows as f64 * g.tile_height + g.total_vertical_spacing();
    prop_assert!((across - g.usable_width()).abs() <= 1.0);
    prop_assert!((down - g.usable_height()).abs() <= 1.0);
    prop_assert!(g.tile_scale <= 1.0);
    Ok(())
}

proptest! {
    // Spacing demands stay well under the usable extent, so every case solves.
    #[test]
    fn prop_between_always_solves_and_fills(
        columns in 2usize..7,
        rows in 2usize..7,
        width_px in 40u32..400,
        height_px in 40u32..400,
        margin in 0.0f64..1500.0,
        min_spacing in 0.0f64..400.0,
    ) {
        let spec = GridSpec {
            page: PageSize::Letter,
            margins: Margins::uniform(margin),
            columns,
            rows,
            tile: TileSize::new(width_px, height_px),
            mode: LayoutMode::Between { min_spacing },
        };
        let g = compute_geometry(&spec);
        prop_assert!(g.is_ok(), "{:?}", g);
        let g = g.unwrap();
        assert_fills_usable_extent(&g)?;
        prop_assert!(g.horizontal_spacing >= min_spacing - 1e-6);
        prop_assert!(g.vertical_spacing >= min_spacing - 1e-6);
    }

    // At most 4 x 150px across (9000 twips) and 4 x 200px down (12000 twips),
    // which fit inside Letter with 1500-twip margins.
    #[test]
    fn prop_distributed_fits_and_fills(
        columns in 2usize..5,
        rows in 2usize..5,
        width_px in 40u32..150,
        height_px in 40u32..200,
        margin in 0.0f64..1500.0,
    ) {
        let spec = GridSpec {
            page: PageSize::Letter,
            margins: Margins::uniform(margin),
            columns,
            rows,
            tile: TileSize::new(width_px, height_px),
            mode: LayoutMode::Distributed,
        };
        let g = compute_geometry(&spec);
        prop_assert!(g.is_ok(), "{:?}", g);
        let g = g.unwrap();
        assert_fills_usable_extent(&g)?;
        prop_assert_eq!(g.tile_scale, 1.0);
        prop_assert!(g.horizontal_spacing > 0.0);
    }

    #[test]
    fn prop_pagination_pads_only_the_last_page(
        total in 0usize..50,
        preset in prop_oneof![Just(LayoutPreset::Dense), Just(LayoutPreset::Compact)],
    ) {
        let g = compute_geometry(&preset.grid_spec()).unwrap();
        let per_page = g.per_page();
        prop_assert!(per_page == 8 || per_page == 16);

        let pages = paginate(total, &g);
        prop_assert_eq!(pages.len(), page_count(total, per_page));
        prop_assert_eq!(pages.len(), total.div_ceil(per_page));
        for page in &pages {
            prop_assert_eq!(page.slots.len(), per_page);
        }
        if let Some((last, full)) = pages.split_last() {
            prop_assert!(full.iter().all(|p| p.placeholder_count() == 0));
            prop_assert_eq!(last.real_count(), total - (pages.len() - 1) * per_page);
        }
    }
}
