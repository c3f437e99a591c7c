use std::path::{Path, PathBuf};

use crate::error::PadResult;
use crate::options::ExportFormat;

/// A file the pad wants the host to save.
#[derive(Debug, Clone, Copy)]
pub struct DownloadFile<'a> {
    /// File name including the extension
    pub filename: &'a str,
    pub format: ExportFormat,
    pub mime: &'a str,
    pub bytes: &'a [u8],
}

/// Where `download` delivers exported files.
pub trait DownloadSink {
    fn save_file(&mut self, file: DownloadFile<'_>) -> PadResult<()>;
}

/// Writes downloads into a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save_file(&mut self, file: DownloadFile<'_>) -> PadResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        // Only the final component is used so names cannot escape the directory
        let name = Path::new(file.filename)
            .file_name()
            .map_or_else(|| PathBuf::from("signature"), PathBuf::from);
        let path = self.dir.join(name);
        std::fs::write(&path, file.bytes)?;
        log::info!("Saved {} ({} bytes) to {}", file.mime, file.bytes.len(), path.display());
        Ok(())
    }
}
