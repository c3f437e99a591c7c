use egui::Pos2;
use serde::Serialize;

use crate::options::ExportFormat;

/// Notifications emitted by a signature pad.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PadEvent {
    /// A segment was drawn to `point` (canvas coordinates)
    Draw { point: Pos2 },
    Clear,
    /// An entry was removed from the history
    Undo,
    Save {
        #[serde(rename = "dataUrl")]
        data_url: String,
    },
    Download {
        #[serde(rename = "dataUrl")]
        data_url: String,
        filename: String,
        format: ExportFormat,
    },
    /// A saved signature finished decoding and replaced the drawing
    Load {
        #[serde(rename = "dataUrl")]
        data_url: String,
    },
    Error { message: String },
    Destroy,
}

impl PadEvent {
    /// Event name as seen by host listeners.
    pub fn name(&self) -> &'static str {
        match self {
            PadEvent::Draw { .. } => "draw",
            PadEvent::Clear => "clear",
            PadEvent::Undo => "undo",
            PadEvent::Save { .. } => "save",
            PadEvent::Download { .. } => "download",
            PadEvent::Load { .. } => "load",
            PadEvent::Error { .. } => "error",
            PadEvent::Destroy => "destroy",
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        PadEvent::Error {
            message: message.into(),
        }
    }
}
