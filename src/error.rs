use thiserror::Error;

use crate::storage::StorageError;

/// Errors produced by the signature pad engine.
///
/// Empty-pad conditions are not errors: exports return
/// [`ExportOutput::Empty`](crate::export::ExportOutput::Empty) and
/// save/download report through the `error` notification instead.
#[derive(Debug, Error)]
pub enum PadError {
    #[error("Invalid value for option `{name}`: {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("Invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid font data: {0}")]
    InvalidFont(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("No saved signature found")]
    NothingSaved,

    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations
pub type PadResult<T> = Result<T, PadError>;
