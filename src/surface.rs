use egui::{Color32, Pos2};
use tiny_skia::{
    Color, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke as LineStroke, Transform,
};

use crate::error::{PadError, PadResult};
use crate::stroke::PenStyle;

/// Largest accepted width or height, the common browser canvas limit.
pub const MAX_SURFACE_DIMENSION: u32 = 16_384;
/// Largest accepted pixel count.
pub const MAX_SURFACE_AREA: u64 = 4096 * 4096 * 4;

/// The software drawing surface the pad renders onto.
///
/// Pixels start fully transparent; the configured background color is only
/// applied by the raster export.
#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> PadResult<Self> {
        Ok(Self {
            pixmap: new_pixmap(width, height)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Strokes a single straight segment with round caps and joins.
    pub fn draw_segment(&mut self, from: Pos2, to: Pos2, style: PenStyle) {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        let Some(path) = builder.finish() else {
            return;
        };

        let paint = solid_paint(style.color);
        let stroke = LineStroke {
            width: style.size,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..LineStroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Draws `image` scaled to cover the whole surface.
    pub fn draw_image_fill(&mut self, image: &Pixmap) {
        let sx = self.width() as f32 / image.width() as f32;
        let sy = self.height() as f32 / image.height() as f32;
        let quality = if sx == 1.0 && sy == 1.0 {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bilinear
        };
        let paint = PixmapPaint {
            quality,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, image.as_ref(), &paint, Transform::from_scale(sx, sy), None);
    }

    /// Changes the surface dimensions. Like a canvas resize, this discards
    /// the pixels unless `preserve` is set, in which case the old content is
    /// copied back at the origin and cropped to the new size.
    pub fn resize(&mut self, width: u32, height: u32, preserve: bool) -> PadResult<()> {
        let mut resized = new_pixmap(width, height)?;
        if preserve {
            copy_pixels(&self.pixmap, &mut resized);
        }
        self.pixmap = resized;
        Ok(())
    }

    /// Unpremultiplied RGBA value of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
    }
}

pub(crate) fn solid_paint(color: Color32) -> Paint<'static> {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

// Bounded before allocating; `Pixmap::new` only rejects sizes that overflow
fn new_pixmap(width: u32, height: u32) -> PadResult<Pixmap> {
    let too_large = width > MAX_SURFACE_DIMENSION
        || height > MAX_SURFACE_DIMENSION
        || u64::from(width) * u64::from(height) > MAX_SURFACE_AREA;
    if too_large {
        return Err(PadError::InvalidSize { width, height });
    }
    Pixmap::new(width, height).ok_or(PadError::InvalidSize { width, height })
}

// Raw copy, no blending
fn copy_pixels(src: &Pixmap, dst: &mut Pixmap) {
    let row_bytes = src.width().min(dst.width()) as usize * 4;
    let rows = src.height().min(dst.height()) as usize;
    let src_stride = src.width() as usize * 4;
    let dst_stride = dst.width() as usize * 4;

    let src_data = src.data();
    let dst_data = dst.data_mut();
    for row in 0..rows {
        let src_start = row * src_stride;
        let dst_start = row * dst_stride;
        dst_data[dst_start..dst_start + row_bytes]
            .copy_from_slice(&src_data[src_start..src_start + row_bytes]);
    }
}
