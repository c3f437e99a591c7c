use egui::{Pos2, Rect};

/// Raw pointer or touch input as delivered by the host, in viewport (client)
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse or pen button was pressed
    PointerDown { client: Pos2 },
    /// Pointer moved (with or without a button held)
    PointerMove { client: Pos2 },
    /// Mouse or pen button was released
    PointerUp,
    /// Pointer left the drawing surface
    PointerOut,
    /// A touch began; `touches` lists every active touch point
    TouchStart { touches: Vec<Pos2> },
    /// Active touches moved
    TouchMove { touches: Vec<Pos2> },
    /// The last touch was lifted
    TouchEnd,
}

/// Which part of a drawing gesture an input event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

impl InputEvent {
    pub fn phase(&self) -> GesturePhase {
        match self {
            InputEvent::PointerDown { .. } | InputEvent::TouchStart { .. } => GesturePhase::Start,
            InputEvent::PointerMove { .. } | InputEvent::TouchMove { .. } => GesturePhase::Move,
            InputEvent::PointerUp | InputEvent::PointerOut | InputEvent::TouchEnd => {
                GesturePhase::End
            }
        }
    }

    /// Client coordinates carried by the event. Touch events use the first
    /// active touch.
    pub fn client_position(&self) -> Option<Pos2> {
        match self {
            InputEvent::PointerDown { client } | InputEvent::PointerMove { client } => {
                Some(*client)
            }
            InputEvent::TouchStart { touches } | InputEvent::TouchMove { touches } => {
                touches.first().copied()
            }
            InputEvent::PointerUp | InputEvent::PointerOut | InputEvent::TouchEnd => None,
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            InputEvent::TouchStart { .. } | InputEvent::TouchMove { .. } | InputEvent::TouchEnd
        )
    }
}

/// Converts an input event into a point local to the drawing surface whose
/// bounding rectangle (in client coordinates) is `bounds`.
///
/// One input pixel maps to one canvas pixel; no device pixel ratio is applied.
pub fn map_to_canvas(event: &InputEvent, bounds: Rect) -> Option<Pos2> {
    event
        .client_position()
        .map(|client| client - bounds.min.to_vec2())
}
