use std::sync::Arc;
use std::task::Poll;

use egui::{Pos2, Rect, vec2};
use serde_json::Value;

use crate::blob::{Blob, BlobRegistry};
use crate::codec;
use crate::download::{DownloadFile, DownloadSink};
use crate::error::{PadError, PadResult};
use crate::event::{EventBus, EventHandler, PadEvent};
use crate::export::{self, ExportOutput, OverlayFont};
use crate::history::{History, HistoryEntry, SnapshotImage};
use crate::input::{GesturePhase, InputEvent, map_to_canvas};
use crate::load::PendingLoad;
use crate::options::{ExportFormat, OptionEffect, PadOptions};
use crate::recorder::{RecorderStep, StrokeRecorder};
use crate::renderer::CanvasRenderer;
use crate::storage::{KeyValueStore, MemoryStore, SAVED_SIGNATURE_KEY};
use crate::stroke::StrokePoint;
use crate::surface::Surface;
use crate::util::time;

/// Width used until the host reports its container size.
pub const DEFAULT_CONTAINER_WIDTH: u32 = 300;
pub const DEFAULT_DOWNLOAD_NAME: &str = "signature";

/// A signature capture surface.
///
/// The pad turns pointer and touch input into strokes, keeps them in an
/// undoable history and exports the result as PNG, JPEG or SVG. All work
/// happens on the caller's thread; the only deferred step is decoding a
/// saved signature, which runs when the host calls [`poll_load`] or
/// [`finish_load`].
///
/// [`poll_load`]: SignaturePad::poll_load
/// [`finish_load`]: SignaturePad::finish_load
pub struct SignaturePad {
    options: PadOptions,
    container_width: u32,
    // Client-space rectangle of the surface, used to map input
    bounds: Rect,
    surface: Surface,
    renderer: CanvasRenderer,
    recorder: StrokeRecorder,
    history: History,
    events: EventBus,
    store: Arc<dyn KeyValueStore>,
    object_urls: BlobRegistry,
    download_sink: Option<Box<dyn DownloadSink>>,
    overlay_font: OverlayFont,
    pending_load: Option<PendingLoad>,
    enabled: bool,
}

impl std::fmt::Debug for SignaturePad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignaturePad")
            .field("options", &self.options)
            .field("size", &(self.surface.width(), self.surface.height()))
            .field("history_len", &self.history.len())
            .field("recorder", &self.recorder.state())
            .field("events", &self.events)
            .field("object_urls", &self.object_urls.len())
            .field("pending_load", &self.pending_load.is_some())
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl SignaturePad {
    /// Creates a pad backed by an in-memory store and no download sink.
    pub fn new(options: PadOptions) -> PadResult<Self> {
        let width = options.width.unwrap_or(DEFAULT_CONTAINER_WIDTH);
        let surface = Surface::new(width, options.height)?;
        let renderer = CanvasRenderer::new(options.pen());

        Ok(Self {
            container_width: DEFAULT_CONTAINER_WIDTH,
            bounds: Rect::from_min_size(Pos2::ZERO, vec2(width as f32, options.height as f32)),
            surface,
            renderer,
            recorder: StrokeRecorder::new(),
            history: History::new(),
            events: EventBus::new(),
            store: Arc::new(MemoryStore::new()),
            object_urls: BlobRegistry::new(),
            download_sink: None,
            overlay_font: OverlayFont::bundled()?,
            pending_load: None,
            enabled: true,
            options,
        })
    }

    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_download_sink(mut self, sink: impl DownloadSink + 'static) -> Self {
        self.download_sink = Some(Box::new(sink));
        self
    }

    /// Replaces the font used for the custom text and date stamp.
    pub fn set_font(&mut self, font: OverlayFont) -> &mut Self {
        self.overlay_font = font;
        self
    }

    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.events.subscribe(Box::new(handler));
    }

    pub fn options(&self) -> &PadOptions {
        &self.options
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn canvas_bounds(&self) -> Rect {
        self.bounds
    }

    /// Records where the surface currently sits in client coordinates.
    pub fn set_canvas_bounds(&mut self, bounds: Rect) -> &mut Self {
        self.bounds = bounds;
        self
    }

    // --- input ---

    /// Feeds one raw input event to the pad.
    ///
    /// Returns `true` when the host should suppress the platform default
    /// action (scrolling, text selection) for this event.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.enabled {
            return false;
        }

        match event.phase() {
            GesturePhase::Start => {
                let Some(pos) = map_to_canvas(event, self.bounds) else {
                    return false;
                };
                let step = self.recorder.begin(StrokePoint::new(pos, self.renderer.pen()));
                self.apply_step(step);
                true
            }
            GesturePhase::Move => {
                if !self.recorder.is_drawing() {
                    return false;
                }
                let Some(pos) = map_to_canvas(event, self.bounds) else {
                    return false;
                };
                let step = self.recorder.extend(StrokePoint::new(pos, self.renderer.pen()));
                self.apply_step(step);
                true
            }
            GesturePhase::End => {
                self.finish_stroke();
                false
            }
        }
    }

    fn apply_step(&mut self, step: RecorderStep) {
        match step {
            RecorderStep::Started(pos) => self.renderer.begin_path(pos),
            RecorderStep::Extended { to } => {
                self.renderer.line_to(&mut self.surface, to);
                self.events.emit(PadEvent::Draw { point: to });
            }
            RecorderStep::Ignored => {}
        }
    }

    fn finish_stroke(&mut self) {
        if let Some(stroke) = self.recorder.finish() {
            log::trace!("Committed stroke with {} points", stroke.len());
            self.history.append(HistoryEntry::Stroke(stroke));
        }
        self.renderer.end_path();
    }

    // --- history ---

    /// Empties the history and the surface. A gesture in progress keeps
    /// drawing from its next point.
    pub fn clear(&mut self) -> &mut Self {
        self.surface.clear();
        self.history.clear();
        self.recorder.discard_points();
        self.renderer.end_path();
        self.events.emit(PadEvent::Clear);
        self
    }

    /// Removes the most recent entry and redraws the rest. Nothing happens
    /// when the history is empty.
    pub fn undo(&mut self) -> &mut Self {
        if self.history.undo_last().is_none() {
            return self;
        }
        self.renderer
            .replay(&mut self.surface, &self.history, self.options.pen());
        self.events.emit(PadEvent::Undo);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && !self.recorder.has_drawn_segment()
    }

    /// Whether the "Sign here" placeholder should be shown.
    pub fn placeholder_visible(&self) -> bool {
        self.is_empty()
    }

    // --- export ---

    /// Exports the drawing in `format`, or the configured format when
    /// `None`. Raster formats produce a `data:` URI; SVG produces an object
    /// URL that must be released with [`revoke_object_url`].
    ///
    /// [`revoke_object_url`]: SignaturePad::revoke_object_url
    pub fn to_data_url(&mut self, format: Option<ExportFormat>) -> PadResult<ExportOutput> {
        if self.is_empty() {
            return Ok(ExportOutput::Empty);
        }

        let format = format.unwrap_or(self.options.format);
        match format {
            ExportFormat::Png | ExportFormat::Jpeg => {
                let stamp = self.options.show_date.then(time::date_stamp);
                let url = export::render_data_url(
                    &self.surface,
                    &self.options,
                    &self.overlay_font,
                    stamp.as_deref(),
                    format,
                )?;
                Ok(ExportOutput::DataUrl(url))
            }
            ExportFormat::Svg => {
                let svg = export::render_svg(
                    &self.history,
                    self.surface.width(),
                    self.surface.height(),
                    self.options.background_color,
                );
                let url = self
                    .object_urls
                    .create(Blob::new(format.mime_type(), svg.into_bytes()));
                Ok(ExportOutput::ObjectUrl(url))
            }
        }
    }

    pub fn resolve_object_url(&self, url: &str) -> Option<&Blob> {
        self.object_urls.resolve(url)
    }

    pub fn revoke_object_url(&mut self, url: &str) -> bool {
        self.object_urls.revoke(url)
    }

    /// Exports the drawing and hands it to the download sink as
    /// `<filename>.<format>`.
    pub fn download(&mut self, filename: Option<&str>, format: Option<ExportFormat>) -> &mut Self {
        if self.is_empty() {
            log::warn!("Download requested on an empty pad");
            self.events.emit(PadEvent::error("No signature to download"));
            return self;
        }

        let filename = filename.unwrap_or(DEFAULT_DOWNLOAD_NAME).to_owned();
        let format = format.unwrap_or(self.options.format);
        match self.deliver_download(&filename, format) {
            Ok(data_url) => {
                log::info!("Downloaded signature as {filename}.{}", format.extension());
                self.events.emit(PadEvent::Download {
                    data_url,
                    filename,
                    format,
                });
            }
            Err(err) => {
                log::error!("Download failed: {err}");
                self.events.emit(PadEvent::error(err.to_string()));
            }
        }
        self
    }

    fn deliver_download(&mut self, filename: &str, format: ExportFormat) -> PadResult<String> {
        let output = self.to_data_url(Some(format))?;
        let (url, bytes) = match &output {
            ExportOutput::Empty => return Ok(String::new()),
            ExportOutput::DataUrl(url) => (url.clone(), codec::decode_data_url(url)?.bytes),
            ExportOutput::ObjectUrl(url) => {
                let bytes = self
                    .object_urls
                    .resolve(url.as_str())
                    .map(|blob| blob.bytes.clone())
                    .unwrap_or_default();
                (url.as_str().to_owned(), bytes)
            }
        };

        let full_name = format!("{filename}.{}", format.extension());
        let result = match self.download_sink.as_mut() {
            Some(sink) => sink.save_file(DownloadFile {
                filename: &full_name,
                format,
                mime: format.mime_type(),
                bytes: &bytes,
            }),
            None => {
                log::debug!("No download sink configured, skipping {full_name}");
                Ok(())
            }
        };

        if let ExportOutput::ObjectUrl(object_url) = &output {
            self.object_urls.revoke(object_url.as_str());
        }
        result.map(|()| url)
    }

    // --- persistence ---

    /// Writes the current drawing to the store under `savedSignature`.
    ///
    /// The store holds a raster data URI, so an SVG format setting saves PNG.
    pub fn save(&mut self) -> &mut Self {
        if self.is_empty() {
            log::warn!("Save requested on an empty pad");
            self.events.emit(PadEvent::error("No signature to save"));
            return self;
        }

        let format = match self.options.format {
            ExportFormat::Svg => ExportFormat::Png,
            other => other,
        };
        match self.persist(format) {
            Ok(data_url) => {
                log::info!("Saved signature ({} bytes)", data_url.len());
                self.events.emit(PadEvent::Save { data_url });
            }
            Err(err) => {
                log::error!("Failed to save signature: {err}");
                self.events.emit(PadEvent::error(err.to_string()));
            }
        }
        self
    }

    fn persist(&mut self, format: ExportFormat) -> PadResult<String> {
        let data_url = self.to_data_url(Some(format))?.as_str().to_owned();
        self.store.set(SAVED_SIGNATURE_KEY, &data_url)?;
        Ok(data_url)
    }

    /// Reads the saved signature and schedules its decode.
    ///
    /// Returns `true` when a saved value was found. The drawing is replaced
    /// and `load` is emitted once the decode completes via [`poll_load`] or
    /// [`finish_load`]. A second call replaces an unfinished load.
    ///
    /// [`poll_load`]: SignaturePad::poll_load
    /// [`finish_load`]: SignaturePad::finish_load
    pub fn load(&mut self) -> bool {
        let saved = match self.store.get(SAVED_SIGNATURE_KEY) {
            Ok(Some(saved)) if !saved.is_empty() => saved,
            Ok(_) => {
                log::warn!("No saved signature in store");
                self.events.emit(PadEvent::error(PadError::NothingSaved.to_string()));
                return false;
            }
            Err(err) => {
                log::error!("Failed to read saved signature: {err}");
                self.events.emit(PadEvent::error(err.to_string()));
                return false;
            }
        };

        if self.pending_load.is_some() {
            log::debug!("Replacing unfinished load");
        }
        self.pending_load = Some(PendingLoad::new(saved));
        true
    }

    pub fn has_pending_load(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Advances a pending load once. Returns `true` when a load completed
    /// (successfully or not) during this call.
    pub fn poll_load(&mut self) -> bool {
        let Some(pending) = self.pending_load.as_mut() else {
            return false;
        };
        let result = match pending.poll_once() {
            Poll::Pending => return false,
            Poll::Ready(result) => result,
        };
        let data_url = self
            .pending_load
            .take()
            .map(PendingLoad::into_data_url)
            .unwrap_or_default();
        self.complete_load(data_url, result);
        true
    }

    /// Drives a pending load to completion. Does nothing when no load is
    /// pending.
    pub async fn finish_load(&mut self) {
        if let Some(pending) = self.pending_load.take() {
            let (data_url, result) = pending.finish().await;
            self.complete_load(data_url, result);
        }
    }

    fn complete_load(&mut self, data_url: String, result: PadResult<tiny_skia::Pixmap>) {
        let pixels = match result {
            Ok(pixels) => pixels,
            Err(err) => {
                log::error!("Failed to load saved signature: {err}");
                self.events.emit(PadEvent::error(err.to_string()));
                return;
            }
        };

        // A gesture in progress is left alone and commits after the snapshot
        self.history
            .replace_with(HistoryEntry::ImageSnapshot(SnapshotImage::new(data_url.clone(), pixels)));
        self.renderer
            .replay(&mut self.surface, &self.history, self.options.pen());
        log::info!("Loaded saved signature");
        self.events.emit(PadEvent::Load { data_url });
    }

    // --- configuration ---

    /// Updates one option by its camelCase name.
    ///
    /// An invalid value for a known option, or a size the surface cannot
    /// take, is rejected and leaves the configuration as it was.
    pub fn set_option(&mut self, name: &str, value: impl Into<Value>) -> PadResult<&mut Self> {
        let mut updated = self.options.clone();
        let effect = updated.apply(name, value.into()).inspect_err(|err| {
            log::warn!("Rejected option: {err}");
        })?;

        if effect == OptionEffect::Resize {
            let width = updated.width.unwrap_or(self.container_width);
            self.resize_surface(width, updated.height).inspect_err(|err| {
                log::warn!("Rejected option `{name}`: {err}");
            })?;
        }
        self.options = updated;

        match effect {
            OptionEffect::PenColor(color) => self.renderer.set_pen_color(color),
            OptionEffect::PenSize(size) => self.renderer.set_pen_size(size),
            OptionEffect::Resize => self.renderer.set_pen(self.options.pen()),
            OptionEffect::Dark(dark) => log::debug!("Dark presentation set to {dark}"),
            OptionEffect::Stored => {}
            OptionEffect::Passthrough => log::debug!("Stored unrecognized option `{name}`"),
        }
        Ok(self)
    }

    /// Applies options in iteration order, stopping at the first error.
    pub fn set_options<I, K, V>(&mut self, options: I) -> PadResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in options {
            self.set_option(name.as_ref(), value)?;
        }
        Ok(self)
    }

    /// Reports the host container width. Only takes effect when no fixed
    /// width is configured.
    pub fn resize_to_container(&mut self, container_width: u32) -> PadResult<&mut Self> {
        let width = self.options.width.unwrap_or(container_width);
        self.resize_surface(width, self.options.height)?;
        self.container_width = container_width;
        Ok(self)
    }

    // Keeps existing pixels at the origin. On error nothing changes.
    fn resize_surface(&mut self, width: u32, height: u32) -> PadResult<()> {
        if (width, height) == (self.surface.width(), self.surface.height()) {
            return Ok(());
        }

        self.surface.resize(width, height, true)?;
        self.bounds = Rect::from_min_size(self.bounds.min, vec2(width as f32, height as f32));
        log::debug!("Resized surface to {width}x{height}");
        Ok(())
    }

    // --- lifecycle ---

    pub fn enable(&mut self) -> &mut Self {
        self.enabled = true;
        self
    }

    /// Stops reacting to input. A stroke in progress stays open until
    /// input is enabled again.
    pub fn disable(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Tears the pad down, releasing all object URLs.
    pub fn destroy(mut self) {
        self.pending_load = None;
        self.object_urls.clear();
        self.events.emit(PadEvent::Destroy);
    }
}
