use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::stroke::Stroke;

/// A previously persisted signature, loaded back as an opaque bitmap.
#[derive(Clone)]
pub struct SnapshotImage {
    data_url: String,
    pixels: Arc<Pixmap>,
}

// Custom Debug implementation; the pixel buffer is reported by size only
impl std::fmt::Debug for SnapshotImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotImage")
            .field("data_url_len", &self.data_url.len())
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

// Two snapshots are the same entry when they were decoded from the same data
impl PartialEq for SnapshotImage {
    fn eq(&self, other: &Self) -> bool {
        self.data_url == other.data_url
    }
}

impl SnapshotImage {
    pub fn new(data_url: String, pixels: Pixmap) -> Self {
        Self {
            data_url,
            pixels: Arc::new(pixels),
        }
    }

    /// The encoded image exactly as it was read from the store.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn pixels(&self) -> &Pixmap {
        &self.pixels
    }
}

/// One committed item of the drawing history.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// A stroke drawn on this pad
    Stroke(Stroke),
    /// A bitmap restored by `load`
    ImageSnapshot(SnapshotImage),
}

impl HistoryEntry {
    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            HistoryEntry::Stroke(stroke) => Some(stroke),
            HistoryEntry::ImageSnapshot(_) => None,
        }
    }
}

impl From<Stroke> for HistoryEntry {
    fn from(stroke: Stroke) -> Self {
        HistoryEntry::Stroke(stroke)
    }
}

/// Ordered record of committed strokes and loaded snapshots.
///
/// Later entries overlay earlier ones on replay. Entries are never mutated
/// once appended; only the tail can be removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Removes the most recent entry. Returns `None` when already empty.
    pub fn undo_last(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops every entry and keeps `entry` as the only one.
    pub fn replace_with(&mut self, entry: HistoryEntry) {
        self.entries = vec![entry];
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.entries.iter().filter_map(HistoryEntry::as_stroke)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
