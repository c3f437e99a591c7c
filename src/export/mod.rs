//! Raster and vector export of the pad contents.

pub mod raster;
pub mod text;
pub mod vector;

pub use raster::{RasterLayout, compose, render_data_url};
pub use text::{OverlayFont, TextAlign};
pub use vector::render_svg;

use crate::blob::ObjectUrl;

/// Result of `to_data_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutput {
    /// Nothing has been drawn
    Empty,
    /// `data:` URI of a raster export
    DataUrl(String),
    /// Object URL of a registered SVG document
    ObjectUrl(ObjectUrl),
}

impl ExportOutput {
    /// String form handed to the host. Empty pads export as `""`.
    pub fn as_str(&self) -> &str {
        match self {
            ExportOutput::Empty => "",
            ExportOutput::DataUrl(url) => url,
            ExportOutput::ObjectUrl(url) => url.as_str(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ExportOutput::Empty)
    }
}

impl std::fmt::Display for ExportOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
