mod common;

use common::{draw, pad, record_events};
use egui::{Color32, pos2};
use signature_pad::{HistoryEntry, InputEvent, PadEvent};

#[test]
fn test_gesture_commits_one_stroke() {
    let mut pad = pad();
    let events = record_events(&pad);

    draw(&mut pad, &[(10.0, 10.0), (20.0, 10.0), (30.0, 15.0)]);

    assert_eq!(pad.history().len(), 1);
    let stroke = pad.history().strokes().next().unwrap();
    assert_eq!(stroke.len(), 3);
    assert!(!pad.is_empty());

    let draws: Vec<_> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            PadEvent::Draw { point } => Some(*point),
            _ => None,
        })
        .collect();
    assert_eq!(draws, vec![pos2(20.0, 10.0), pos2(30.0, 15.0)]);
}

#[test]
fn test_press_without_move_stores_single_point() {
    let mut pad = pad();
    draw(&mut pad, &[(5.0, 5.0)]);

    assert_eq!(pad.history().len(), 1);
    assert_eq!(pad.history().strokes().next().unwrap().len(), 1);
    // nothing visible was drawn
    assert!(pad.surface().pixmap().data().iter().all(|&b| b == 0));
}

#[test]
fn test_repeated_end_events_are_ignored() {
    let mut pad = pad();
    draw(&mut pad, &[(0.0, 0.0), (5.0, 5.0)]);
    pad.handle_input(&InputEvent::PointerOut);
    pad.handle_input(&InputEvent::TouchEnd);
    assert_eq!(pad.history().len(), 1);
}

#[test]
fn test_touch_gesture_uses_first_touch() {
    let mut pad = pad();
    pad.handle_input(&InputEvent::TouchStart {
        touches: vec![pos2(1.0, 2.0), pos2(100.0, 100.0)],
    });
    pad.handle_input(&InputEvent::TouchMove {
        touches: vec![pos2(11.0, 2.0)],
    });
    pad.handle_input(&InputEvent::TouchEnd);

    let stroke = pad.history().strokes().next().unwrap();
    let positions: Vec<_> = stroke.points().iter().map(|p| p.pos).collect();
    assert_eq!(positions, vec![pos2(1.0, 2.0), pos2(11.0, 2.0)]);
}

#[test]
fn test_second_press_continues_stroke() {
    let mut pad = pad();
    pad.handle_input(&InputEvent::PointerDown { client: pos2(0.0, 0.0) });
    pad.handle_input(&InputEvent::PointerDown { client: pos2(10.0, 0.0) });
    pad.handle_input(&InputEvent::PointerUp);

    assert_eq!(pad.history().len(), 1);
    assert_eq!(pad.history().strokes().next().unwrap().len(), 2);
}

#[test]
fn test_pen_change_mid_stroke_is_recorded_per_point() {
    let mut pad = pad();
    pad.set_option("penSize", 4).unwrap();
    pad.set_option("penColor", "#ff0000").unwrap();

    pad.handle_input(&InputEvent::PointerDown { client: pos2(0.0, 20.0) });
    pad.handle_input(&InputEvent::PointerMove { client: pos2(20.0, 20.0) });
    pad.set_option("penColor", "#00ff00").unwrap();
    pad.handle_input(&InputEvent::PointerMove { client: pos2(40.0, 20.0) });
    pad.handle_input(&InputEvent::PointerMove { client: pos2(60.0, 20.0) });
    pad.handle_input(&InputEvent::PointerUp);

    let red = Color32::from_rgb(255, 0, 0);
    let green = Color32::from_rgb(0, 255, 0);
    let HistoryEntry::Stroke(stroke) = &pad.history().entries()[0] else {
        panic!("expected a stroke entry");
    };
    let colors: Vec<_> = stroke.points().iter().map(|p| p.style.color).collect();
    assert_eq!(colors, vec![red, red, green, green]);

    // force a full replay
    draw(&mut pad, &[(0.0, 100.0), (50.0, 100.0)]);
    pad.undo();

    assert_eq!(pad.surface().pixel(8, 20), Some([255, 0, 0, 255]));
    // the segment leaving the last red point stays red
    assert_eq!(pad.surface().pixel(30, 20), Some([255, 0, 0, 255]));
    assert_eq!(pad.surface().pixel(52, 20), Some([0, 255, 0, 255]));
}

#[test]
fn test_clear_mid_gesture_keeps_drawing() {
    let mut pad = pad();
    let events = record_events(&pad);

    pad.handle_input(&InputEvent::PointerDown { client: pos2(0.0, 0.0) });
    pad.handle_input(&InputEvent::PointerMove { client: pos2(10.0, 0.0) });
    pad.clear();
    assert!(pad.is_empty());

    assert!(pad.handle_input(&InputEvent::PointerMove { client: pos2(20.0, 0.0) }));
    assert!(pad.handle_input(&InputEvent::PointerMove { client: pos2(30.0, 0.0) }));
    pad.handle_input(&InputEvent::PointerUp);

    assert_eq!(pad.history().len(), 1);
    let stroke = pad.history().strokes().next().unwrap();
    let positions: Vec<_> = stroke.points().iter().map(|p| p.pos).collect();
    assert_eq!(positions, vec![pos2(20.0, 0.0), pos2(30.0, 0.0)]);
    assert!(!pad.is_empty());

    let names: Vec<_> = events.borrow().iter().map(PadEvent::name).collect();
    assert_eq!(names, vec!["draw", "clear", "draw", "draw"]);
}
