//! Run configuration and the two shipped layout presets.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::compose::LabelStyle;
use crate::model::{inches, px_to_twips, GridSpec, LayoutMode, Margins, PageSize};

/// Label canvas, grid and packing policy, bundled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
    /// 200x250 labels, 4x4 per Letter page, spacing distributed around tiles.
    #[default]
    Dense,
    /// 256x316 bordered labels, 4x2 per Letter page, 12px between tiles.
    Compact,
}

impl LayoutPreset {
    pub fn grid_spec(self) -> GridSpec {
        match self {
            LayoutPreset::Dense => GridSpec {
                page: PageSize::Letter,
                margins: Margins::uniform(inches(0.3)),
                columns: 4,
                rows: 4,
                // 200px at 96 DPI would need 12000 twips per row; 120 DPI fits.
                tile: LabelStyle::dense().tile_size().at_dpi(120.0),
                mode: LayoutMode::Distributed,
            },
            LayoutPreset::Compact => GridSpec {
                page: PageSize::Letter,
                margins: Margins::uniform(inches(0.7)),
                columns: 4,
                rows: 2,
                tile: LabelStyle::compact().tile_size(),
                mode: LayoutMode::Between {
                    min_spacing: px_to_twips(12.0),
                },
            },
        }
    }

    pub fn label_style(self) -> LabelStyle {
        match self {
            LayoutPreset::Dense => LabelStyle::dense(),
            LayoutPreset::Compact => LabelStyle::compact(),
        }
    }
}

/// Where a run reads its assets from and writes its outputs to.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    /// File name of the PDF, placed in `output_dir` next to the images.
    pub document_name: PathBuf,
    pub logo_path: PathBuf,
    /// TrueType face for label text. The built-in bitmap face when `None`.
    pub font_path: Option<PathBuf>,
    pub preset: LayoutPreset,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("qr-codes"),
            document_name: PathBuf::from("QR_Codes.pdf"),
            logo_path: PathBuf::from("logo.png"),
            font_path: None,
            preset: LayoutPreset::default(),
        }
    }
}
