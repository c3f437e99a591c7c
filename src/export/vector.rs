use std::fmt::Write as _;

use egui::Color32;

use crate::history::{History, HistoryEntry};
use crate::options::css_color;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Serializes the stroke history as an SVG document of `width` x `height`.
///
/// Every drawable stroke becomes one `path` styled by its first point.
/// Restored bitmap snapshots have no vector form and are left out.
pub fn render_svg(history: &History, width: u32, height: u32, background: Color32) -> String {
    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = write!(
        svg,
        r#"<svg xmlns="{SVG_NAMESPACE}" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = write!(
        svg,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        css_color(background)
    );

    let mut skipped = 0;
    for entry in history.entries() {
        let stroke = match entry {
            HistoryEntry::Stroke(stroke) => stroke,
            HistoryEntry::ImageSnapshot(_) => {
                skipped += 1;
                continue;
            }
        };
        if !stroke.is_drawable() {
            continue;
        }
        let Some(style) = stroke.leading_style() else {
            continue;
        };

        let mut data = String::new();
        for (i, point) in stroke.points().iter().enumerate() {
            let command = if i == 0 { "M" } else { " L" };
            let _ = write!(data, "{command} {} {}", point.pos.x, point.pos.y);
        }
        let _ = write!(
            svg,
            r#"<path d="{data}" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round" fill="none"/>"#,
            css_color(style.color),
            style.size
        );
    }
    svg.push_str("</svg>");

    if skipped > 0 {
        log::debug!("Left {skipped} bitmap snapshot(s) out of the svg export");
    }
    svg
}
