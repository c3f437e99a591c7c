use ab_glyph::{Font, FontArc, Glyph, GlyphId, PxScale, ScaleFont, point};
use egui::Color32;
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::error::{PadError, PadResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `x` is where the text starts
    Left,
    /// `x` is where the text ends
    Right,
}

/// Font used for the custom text and date stamp of a raster export.
#[derive(Clone)]
pub struct OverlayFont {
    font: FontArc,
}

impl std::fmt::Debug for OverlayFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayFont")
            .field("glyph_count", &self.font.glyph_count())
            .finish()
    }
}

impl OverlayFont {
    /// The proportional font egui ships by default.
    pub fn bundled() -> PadResult<Self> {
        FontArc::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)
            .map(|font| Self { font })
            .map_err(|err| PadError::InvalidFont(err.to_string()))
    }

    /// Loads a TrueType/OpenType font supplied by the host.
    pub fn from_bytes(bytes: Vec<u8>) -> PadResult<Self> {
        FontArc::try_from_vec(bytes)
            .map(|font| Self { font })
            .map_err(|err| PadError::InvalidFont(err.to_string()))
    }

    /// Advance width of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        self.layout(text, size, 0.0, 0.0).1
    }

    /// Fills `text` with its alphabetic baseline at `baseline`.
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        x: f32,
        baseline: f32,
        size: f32,
        align: TextAlign,
        color: Color32,
    ) {
        let start = match align {
            TextAlign::Left => x,
            TextAlign::Right => x - self.measure(text, size),
        };
        let (glyphs, _) = self.layout(text, size, start, baseline);

        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i32 + gx as i32;
                let py = bounds.min.y as i32 + gy as i32;
                blend_pixel(pixmap, px, py, color, coverage);
            });
        }
    }

    fn layout(&self, text: &str, size: f32, x: f32, baseline: f32) -> (Vec<Glyph>, f32) {
        let scale = PxScale::from(size);
        let scaled = self.font.as_scaled(scale);

        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }
            glyphs.push(id.with_scale_and_position(scale, point(x + caret, baseline)));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }
        (glyphs, caret)
    }
}

// Source-over blend of `color` at `coverage` onto one premultiplied pixel
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Color32, coverage: f32) {
    let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }

    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let alpha = f32::from(a) / 255.0 * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let index = (y * width + x) as usize;
    let pixels = pixmap.pixels_mut();
    let dst = pixels[index];
    let keep = 1.0 - alpha;
    let mix = |src: u8, dst: u8| (f32::from(src) * alpha + f32::from(dst) * keep).round() as u8;

    if let Some(blended) = PremultipliedColorU8::from_rgba(
        mix(r, dst.red()),
        mix(g, dst.green()),
        mix(b, dst.blue()),
        mix(u8::MAX, dst.alpha()),
    ) {
        pixels[index] = blended;
    }
}
