mod common;

use std::sync::Arc;

use common::{draw, init_logger, pad, record_events};
use futures::executor::block_on;
use egui::pos2;
use signature_pad::storage::SAVED_SIGNATURE_KEY;
use signature_pad::{FileStore, HistoryEntry, InputEvent, KeyValueStore, MemoryStore, PadEvent, PadOptions, SignaturePad};

fn pad_with_store(store: Arc<dyn KeyValueStore>) -> SignaturePad {
    init_logger();
    SignaturePad::new(PadOptions::default()).unwrap().with_store(store)
}

#[test]
fn test_save_then_load_restores_drawing() {
    let store = Arc::new(MemoryStore::new());
    let mut first = pad_with_store(store.clone());
    first.set_option("penSize", 6).unwrap();
    draw(&mut first, &[(20.0, 50.0), (200.0, 50.0)]);
    let events = record_events(&first);

    first.save();
    let saved = store.get(SAVED_SIGNATURE_KEY).unwrap().unwrap();
    assert!(saved.starts_with("data:image/png;base64,"));
    assert_eq!(events.borrow().as_slice(), &[PadEvent::Save { data_url: saved.clone() }]);

    let mut second = pad_with_store(store);
    let events = record_events(&second);
    assert!(second.load());
    // nothing changes until the decode is driven
    assert!(second.is_empty());
    assert!(events.borrow().is_empty());

    block_on(second.finish_load());
    assert!(!second.is_empty());
    assert!(!second.has_pending_load());
    assert!(matches!(
        second.history().entries(),
        [HistoryEntry::ImageSnapshot(snapshot)] if snapshot.data_url() == saved
    ));
    assert_eq!(events.borrow().as_slice(), &[PadEvent::Load { data_url: saved }]);

    let [r, g, b, a] = second.surface().pixel(100, 50).unwrap();
    assert!(r < 64 && g < 64 && b < 64 && a == 255);
}

#[test]
fn test_poll_load_completes_synchronously() {
    let store = Arc::new(MemoryStore::new());
    let mut first = pad_with_store(store.clone());
    draw(&mut first, &[(20.0, 50.0), (200.0, 50.0)]);
    first.save();

    let mut second = pad_with_store(store);
    assert!(!second.poll_load());
    assert!(second.load());
    assert!(second.poll_load());
    assert_eq!(second.history().len(), 1);
}

#[test]
fn test_load_without_saved_signature() {
    let mut pad = pad();
    let events = record_events(&pad);

    assert!(!pad.load());
    assert_eq!(
        events.borrow().as_slice(),
        &[PadEvent::Error { message: "No saved signature found".to_owned() }]
    );
}

#[test]
fn test_save_empty_pad_reports_error() {
    let store = Arc::new(MemoryStore::new());
    let mut pad = pad_with_store(store.clone());
    let events = record_events(&pad);

    pad.save();
    assert_eq!(
        events.borrow().as_slice(),
        &[PadEvent::Error { message: "No signature to save".to_owned() }]
    );
    assert!(store.is_empty());
}

#[test]
fn test_quota_failure_is_reported() {
    let mut pad = pad_with_store(Arc::new(MemoryStore::with_quota(64)));
    draw(&mut pad, &[(20.0, 50.0), (200.0, 50.0)]);
    let events = record_events(&pad);

    pad.save();
    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], PadEvent::Error { message } if message.contains("quota")));
}

#[test]
fn test_malformed_saved_value_keeps_history() {
    let store = Arc::new(MemoryStore::new());
    store.set(SAVED_SIGNATURE_KEY, "data:image/png;base64,bm90IGFuIGltYWdl").unwrap();
    let mut pad = pad_with_store(store);
    draw(&mut pad, &[(0.0, 0.0), (30.0, 30.0)]);
    let history = pad.history().clone();
    let events = record_events(&pad);

    assert!(pad.load());
    block_on(pad.finish_load());

    assert_eq!(pad.history(), &history);
    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), "error");
}

#[test]
fn test_svg_format_saves_png() {
    let store = Arc::new(MemoryStore::new());
    let mut pad = pad_with_store(store.clone());
    pad.set_option("format", "svg").unwrap();
    draw(&mut pad, &[(0.0, 0.0), (30.0, 30.0)]);

    pad.save();
    let saved = store.get(SAVED_SIGNATURE_KEY).unwrap().unwrap();
    assert!(saved.starts_with("data:image/png;base64,"));
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("signatures.json");

    let mut first = pad_with_store(Arc::new(FileStore::new(&path).unwrap()));
    draw(&mut first, &[(20.0, 50.0), (200.0, 50.0)]);
    first.save();

    let mut second = pad_with_store(Arc::new(FileStore::new(&path).unwrap()));
    assert!(second.load());
    block_on(second.finish_load());
    assert_eq!(second.history().len(), 1);
}

#[test]
fn test_load_finishing_mid_gesture_keeps_stroke() {
    let store = Arc::new(MemoryStore::new());
    let mut first = pad_with_store(store.clone());
    draw(&mut first, &[(20.0, 50.0), (200.0, 50.0)]);
    first.save();

    let mut pad = pad_with_store(store);
    pad.handle_input(&InputEvent::PointerDown { client: pos2(10.0, 150.0) });
    pad.handle_input(&InputEvent::PointerMove { client: pos2(40.0, 150.0) });
    assert!(pad.load());
    block_on(pad.finish_load());

    assert!(pad.handle_input(&InputEvent::PointerMove { client: pos2(80.0, 150.0) }));
    pad.handle_input(&InputEvent::PointerUp);

    let entries = pad.history().entries();
    assert_eq!(entries.len(), 2);
    assert!(matches!(entries[0], HistoryEntry::ImageSnapshot(_)));
    let HistoryEntry::Stroke(stroke) = &entries[1] else {
        panic!("expected the live stroke after the snapshot");
    };
    assert_eq!(stroke.len(), 3);
}
