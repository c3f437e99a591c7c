#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use egui::pos2;
use signature_pad::{InputEvent, PadEvent, PadOptions, SignaturePad};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn pad() -> SignaturePad {
    init_logger();
    SignaturePad::new(PadOptions::default()).unwrap()
}

/// Collects every event the pad emits.
pub fn record_events(pad: &SignaturePad) -> Rc<RefCell<Vec<PadEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    pad.subscribe(move |event: &PadEvent| sink.borrow_mut().push(event.clone()));
    events
}

/// Draws a polyline with mouse events.
pub fn draw(pad: &mut SignaturePad, points: &[(f32, f32)]) {
    let mut iter = points.iter();
    if let Some(&(x, y)) = iter.next() {
        pad.handle_input(&InputEvent::PointerDown { client: pos2(x, y) });
    }
    for &(x, y) in iter {
        pad.handle_input(&InputEvent::PointerMove { client: pos2(x, y) });
    }
    pad.handle_input(&InputEvent::PointerUp);
}

pub fn surface_bytes(pad: &SignaturePad) -> Vec<u8> {
    pad.surface().pixmap().data().to_vec()
}
