use egui::Pos2;

use crate::stroke::{MutableStroke, Stroke, StrokePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Drawing,
}

/// What a recorder transition asks the renderer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecorderStep {
    /// A new stroke began at this point; open a path there
    Started(Pos2),
    /// A point was appended; continue the open path to it
    Extended { to: Pos2 },
    /// Nothing happened (move without a press)
    Ignored,
}

/// Accumulates points of the stroke currently being drawn.
///
/// Only one stroke can be live at a time. A start while already drawing
/// resumes the current gesture instead of opening a second stroke.
#[derive(Debug, Default)]
pub struct StrokeRecorder {
    state: RecorderState,
    // Transient state: the stroke being drawn (if any)
    buffer: MutableStroke,
    drew_segment: bool,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == RecorderState::Drawing
    }

    /// True once the live stroke has at least one visible segment.
    pub fn has_drawn_segment(&self) -> bool {
        self.drew_segment
    }

    pub fn live_points(&self) -> &[StrokePoint] {
        self.buffer.points()
    }

    /// Handles a draw-start.
    pub fn begin(&mut self, point: StrokePoint) -> RecorderStep {
        if self.is_drawing() {
            log::debug!("Draw start while drawing, continuing current stroke");
            return self.extend(point);
        }

        self.buffer.clear();
        self.buffer.add_point(point);
        self.state = RecorderState::Drawing;
        RecorderStep::Started(point.pos)
    }

    /// Handles a draw-move. Ignored unless a stroke is live.
    pub fn extend(&mut self, point: StrokePoint) -> RecorderStep {
        if !self.is_drawing() {
            return RecorderStep::Ignored;
        }

        self.buffer.add_point(point);
        self.drew_segment = true;
        RecorderStep::Extended { to: point.pos }
    }

    /// Handles a draw-end. Returns the finished stroke when there is one to
    /// commit; repeated end events return `None`.
    pub fn finish(&mut self) -> Option<Stroke> {
        if !self.is_drawing() {
            return None;
        }

        self.state = RecorderState::Idle;
        self.drew_segment = false;
        if self.buffer.is_empty() {
            return None;
        }
        Some(self.buffer.take_stroke())
    }

    /// Drops the captured points but keeps a gesture in progress alive.
    /// The next move starts the buffer again from its point.
    pub fn discard_points(&mut self) {
        self.buffer.clear();
        self.drew_segment = false;
    }
}
