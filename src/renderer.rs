use egui::{Color32, Pos2};

use crate::history::{History, HistoryEntry};
use crate::stroke::PenStyle;
use crate::surface::Surface;

/// Draws strokes onto a [`Surface`], either one segment at a time while a
/// gesture is live or by replaying the whole history.
#[derive(Debug)]
pub struct CanvasRenderer {
    // Style used by incremental drawing
    pen: PenStyle,
    // End of the live incremental path, if one is open
    cursor: Option<Pos2>,
}

impl CanvasRenderer {
    pub fn new(pen: PenStyle) -> Self {
        Self { pen, cursor: None }
    }

    pub fn pen(&self) -> PenStyle {
        self.pen
    }

    pub fn set_pen_color(&mut self, color: Color32) {
        self.pen.color = color;
    }

    pub fn set_pen_size(&mut self, size: f32) {
        self.pen.size = size;
    }

    pub fn set_pen(&mut self, pen: PenStyle) {
        self.pen = pen;
    }

    /// Opens an incremental path at `start`.
    pub fn begin_path(&mut self, start: Pos2) {
        self.cursor = Some(start);
    }

    /// Draws the segment from the end of the open path to `to` with the
    /// current pen, then continues the path from `to`.
    pub fn line_to(&mut self, surface: &mut Surface, to: Pos2) {
        if let Some(from) = self.cursor {
            surface.draw_segment(from, to, self.pen);
        }
        self.cursor = Some(to);
    }

    pub fn end_path(&mut self) {
        self.cursor = None;
    }

    /// Rebuilds the surface from `history`.
    ///
    /// Each segment takes the style of its starting point, so a pen change
    /// recorded mid-stroke shows up exactly where it happened. Afterwards the
    /// pen is reset to `pen` so the next live stroke is unaffected.
    pub fn replay(&mut self, surface: &mut Surface, history: &History, pen: PenStyle) {
        surface.clear();

        for entry in history.entries() {
            match entry {
                HistoryEntry::Stroke(stroke) => {
                    if !stroke.is_drawable() {
                        continue;
                    }
                    for (from, to) in stroke.segments() {
                        surface.draw_segment(from.pos, to.pos, from.style);
                    }
                }
                HistoryEntry::ImageSnapshot(snapshot) => {
                    surface.draw_image_fill(snapshot.pixels());
                }
            }
        }

        log::debug!("Replayed {} history entries", history.len());
        self.pen = pen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Stroke, StrokePoint};
    use egui::pos2;

    fn line(y: f32, style: PenStyle) -> HistoryEntry {
        Stroke::new(vec![
            StrokePoint::new(pos2(0.0, y), style),
            StrokePoint::new(pos2(30.0, y), style),
        ])
        .into()
    }

    #[test]
    fn test_replay_is_idempotent() {
        let mut history = History::new();
        history.append(line(5.0, PenStyle::new(Color32::RED, 3.0)));
        history.append(line(15.0, PenStyle::new(Color32::BLUE, 5.0)));

        let mut renderer = CanvasRenderer::new(PenStyle::default());
        let mut surface = Surface::new(30, 30).unwrap();

        renderer.replay(&mut surface, &history, PenStyle::default());
        let first = surface.pixmap().data().to_vec();
        renderer.replay(&mut surface, &history, PenStyle::default());
        assert_eq!(first, surface.pixmap().data());
    }

    #[test]
    fn test_replay_of_empty_history_clears() {
        let mut renderer = CanvasRenderer::new(PenStyle::default());
        let mut surface = Surface::new(30, 30).unwrap();
        renderer.begin_path(pos2(0.0, 0.0));
        renderer.line_to(&mut surface, pos2(30.0, 30.0));

        renderer.replay(&mut surface, &History::new(), PenStyle::default());
        assert!(surface.pixmap().data().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_replay_resets_pen() {
        let mut renderer = CanvasRenderer::new(PenStyle::new(Color32::RED, 9.0));
        let mut surface = Surface::new(10, 10).unwrap();
        let pen = PenStyle::new(Color32::GREEN, 1.0);

        renderer.replay(&mut surface, &History::new(), pen);
        assert_eq!(renderer.pen(), pen);
    }

    #[test]
    fn test_incremental_uses_current_pen() {
        let mut renderer = CanvasRenderer::new(PenStyle::new(Color32::RED, 4.0));
        let mut surface = Surface::new(20, 20).unwrap();

        renderer.begin_path(pos2(0.0, 10.0));
        renderer.line_to(&mut surface, pos2(10.0, 10.0));
        renderer.set_pen_color(Color32::BLUE);
        renderer.line_to(&mut surface, pos2(20.0, 10.0));

        assert_eq!(surface.pixel(4, 10), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(16, 10), Some([0, 0, 255, 255]));
    }
}
