use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

/// Pen color and width captured with every point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenStyle {
    pub color: Color32,
    pub size: f32,
}

impl PenStyle {
    pub fn new(color: Color32, size: f32) -> Self {
        Self { color, size }
    }
}

impl Default for PenStyle {
    fn default() -> Self {
        Self::new(Color32::BLACK, 2.0)
    }
}

/// A canvas-local position together with the pen style active when it was
/// captured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub pos: Pos2,
    pub style: PenStyle,
}

impl StrokePoint {
    pub fn new(pos: Pos2, style: PenStyle) -> Self {
        Self { pos, style }
    }
}

// Immutable stroke stored in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<StrokePoint>,
}

// Working buffer for the stroke currently being drawn
#[derive(Debug, Default)]
pub struct MutableStroke {
    points: Vec<StrokePoint>,
}

impl Stroke {
    pub fn new(points: Vec<StrokePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A stroke needs at least two points to produce a visible segment.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Consecutive point pairs, in capture order.
    pub fn segments(&self) -> impl Iterator<Item = (&StrokePoint, &StrokePoint)> {
        self.points.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Style of the first point; the vector export strokes the whole path with it.
    pub fn leading_style(&self) -> Option<PenStyle> {
        self.points.first().map(|point| point.style)
    }
}

impl MutableStroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, point: StrokePoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn last_point(&self) -> Option<&StrokePoint> {
        self.points.last()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Moves the buffered points out into an immutable stroke, leaving the
    /// buffer empty.
    pub fn take_stroke(&mut self) -> Stroke {
        Stroke::new(std::mem::take(&mut self.points))
    }
}
