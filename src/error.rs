//! Structured error types for the sheet pipeline.
//!
//! One variant per real failure source: layout configuration, QR encoding,
//! PNG encode/decode, and the filesystem operations around them. A missing
//! logo is not an error; the composer falls back to text-only labels.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::layout::LayoutError;

/// The unified error type returned by all public qrsheet API functions.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The page/grid configuration has no valid geometry.
    #[error("invalid page layout")]
    Layout(#[from] LayoutError),

    /// The label text could not be encoded as a QR symbol.
    #[error("failed to encode QR symbol for '{text}': {reason}")]
    Qr { text: String, reason: String },

    /// A composed label could not be PNG-encoded.
    #[error("failed to encode PNG for '{text}'")]
    Encode {
        text: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create output directory '{}'", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write image '{}'", path.display())]
    WriteImage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A generated image could not be read back during assembly.
    #[error("failed to read image '{}'", path.display())]
    ReadImage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A tile's bytes are not a decodable PNG.
    #[error("failed to decode image for '{label}': {reason}")]
    Decode { label: String, reason: String },

    #[error("failed to write document '{}'", path.display())]
    WriteDocument {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configured TrueType font could not be loaded.
    #[error("font error for '{}': {reason}", path.display())]
    Font { path: PathBuf, reason: String },
}
