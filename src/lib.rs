#![warn(clippy::all, rust_2018_idioms)]

pub mod blob;
pub mod codec;
pub mod download;
pub mod error;
pub mod event;
pub mod export;
pub mod history;
pub mod input;
pub mod load;
pub mod options;
pub mod pad;
pub mod recorder;
pub mod renderer;
pub mod storage;
pub mod stroke;
pub mod surface;
pub mod util;

pub use blob::{Blob, ObjectUrl};
pub use download::{DirectorySink, DownloadFile, DownloadSink};
pub use error::{PadError, PadResult};
pub use event::{EventHandler, PadEvent};
pub use export::{ExportOutput, OverlayFont};
pub use history::{History, HistoryEntry, SnapshotImage};
pub use input::InputEvent;
pub use options::{ExportFormat, PadOptions};
pub use pad::SignaturePad;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use stroke::{PenStyle, Stroke, StrokePoint};
