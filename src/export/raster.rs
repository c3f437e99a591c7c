use egui::Color32;
use tiny_skia::{Color, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke as LineStroke, Transform};

use super::text::{OverlayFont, TextAlign};
use crate::codec;
use crate::error::{PadError, PadResult};
use crate::options::{ExportFormat, PadOptions};
use crate::surface::{Surface, solid_paint};

/// Margin around the drawing when a border is requested.
pub const BORDER_PADDING: u32 = 20;
/// Height of the band below the drawing that holds custom text and the date.
pub const TEXT_BAND_HEIGHT: u32 = 30;
pub const BORDER_WIDTH: f32 = 2.0;
pub const OVERLAY_FONT_SIZE: f32 = 14.0;
// Distance of the text baseline from the bottom edge
const TEXT_BASELINE_OFFSET: f32 = 15.0;

/// Dimensions of a composited export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterLayout {
    pub padding: u32,
    pub extra_height: u32,
    pub width: u32,
    pub height: u32,
}

impl RasterLayout {
    pub fn new(surface_width: u32, surface_height: u32, options: &PadOptions) -> Self {
        let padding = if options.add_border { BORDER_PADDING } else { 0 };
        let extra_height = if options.show_date || options.has_custom_text() {
            TEXT_BAND_HEIGHT
        } else {
            0
        };
        Self {
            padding,
            extra_height,
            width: surface_width + padding * 2,
            height: surface_height + padding * 2 + extra_height,
        }
    }
}

/// Composes background, border, the current surface pixels and the text band
/// into a new pixmap.
///
/// The surface is used as it is, so it must already reflect the full history.
pub fn compose(
    surface: &Surface,
    options: &PadOptions,
    font: &OverlayFont,
    date_stamp: Option<&str>,
) -> PadResult<Pixmap> {
    let layout = RasterLayout::new(surface.width(), surface.height(), options);
    let mut output = Pixmap::new(layout.width, layout.height).ok_or(PadError::InvalidSize {
        width: layout.width,
        height: layout.height,
    })?;

    let [r, g, b, a] = options.background_color.to_srgba_unmultiplied();
    output.fill(Color::from_rgba8(r, g, b, a));

    if options.add_border {
        draw_border(&mut output, &layout);
    }

    let offset = layout.padding as i32;
    output.draw_pixmap(
        offset,
        offset,
        surface.pixmap().as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );

    if layout.extra_height > 0 {
        let baseline = layout.height as f32 - TEXT_BASELINE_OFFSET;
        if options.has_custom_text() {
            font.draw(
                &mut output,
                &options.custom_text,
                layout.padding as f32,
                baseline,
                OVERLAY_FONT_SIZE,
                TextAlign::Left,
                Color32::BLACK,
            );
        }
        if let Some(stamp) = date_stamp.filter(|_| options.show_date) {
            font.draw(
                &mut output,
                stamp,
                (layout.width - layout.padding) as f32,
                baseline,
                OVERLAY_FONT_SIZE,
                TextAlign::Right,
                Color32::BLACK,
            );
        }
    }

    Ok(output)
}

fn draw_border(output: &mut Pixmap, layout: &RasterLayout) {
    let inset = layout.padding as f32 / 2.0;
    let Some(rect) = Rect::from_xywh(
        inset,
        inset,
        (layout.width - layout.padding) as f32,
        (layout.height - layout.padding - layout.extra_height) as f32,
    ) else {
        return;
    };

    let path = PathBuilder::from_rect(rect);
    let stroke = LineStroke {
        width: BORDER_WIDTH,
        ..LineStroke::default()
    };
    output.stroke_path(
        &path,
        &solid_paint(Color32::BLACK),
        &stroke,
        Transform::identity(),
        None,
    );
}

/// Composes and encodes the export as a `data:` URI.
pub fn render_data_url(
    surface: &Surface,
    options: &PadOptions,
    font: &OverlayFont,
    date_stamp: Option<&str>,
    format: ExportFormat,
) -> PadResult<String> {
    let output = compose(surface, options, font, date_stamp)?;
    let bytes = codec::encode_raster(&output, format)?;
    log::debug!(
        "Encoded {}x{} {} export ({} bytes)",
        output.width(),
        output.height(),
        format,
        bytes.len()
    );
    Ok(codec::encode_data_url(format.mime_type(), &bytes))
}
