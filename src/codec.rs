use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use tiny_skia::{ColorU8, Pixmap};

use crate::error::{PadError, PadResult};
use crate::options::ExportFormat;

/// Quality browsers use for `toDataURL("image/jpeg")` when none is given.
pub const JPEG_QUALITY: u8 = 92;

/// The parts of a `data:` URI.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Wraps `bytes` as a self-contained base64 `data:` URI.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

pub fn decode_data_url(text: &str) -> PadResult<DataUrl> {
    let rest = text
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| PadError::MalformedDataUrl("missing `data:` scheme".to_owned()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| PadError::MalformedDataUrl("missing payload separator".to_owned()))?;

    let (mime, is_base64) = match header.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (header, false),
    };
    let bytes = if is_base64 {
        STANDARD
            .decode(payload)
            .map_err(|err| PadError::MalformedDataUrl(err.to_string()))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(DataUrl {
        mime: mime.to_owned(),
        bytes,
    })
}

/// Decodes an encoded PNG/JPEG into a premultiplied pixmap.
pub fn decode_image(bytes: &[u8]) -> PadResult<Pixmap> {
    let decoded = image::load_from_memory(bytes)?;
    log::debug!("Decoded image: {}x{}", decoded.width(), decoded.height());
    rgba_to_pixmap(&decoded.to_rgba8())
}

pub fn rgba_to_pixmap(rgba: &RgbaImage) -> PadResult<Pixmap> {
    let (width, height) = rgba.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(PadError::InvalidSize { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

pub fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut raw = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        raw.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), raw)
        .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()))
}

// JPEG has no alpha channel. Translucent pixels end up over opaque black,
// which for premultiplied data is the color channels as stored.
fn flatten_on_black(pixmap: &Pixmap) -> RgbImage {
    let mut raw = Vec::with_capacity(pixmap.pixels().len() * 3);
    for pixel in pixmap.pixels() {
        raw.extend_from_slice(&[pixel.red(), pixel.green(), pixel.blue()]);
    }
    RgbImage::from_raw(pixmap.width(), pixmap.height(), raw)
        .unwrap_or_else(|| RgbImage::new(pixmap.width(), pixmap.height()))
}

/// Encodes `pixmap` as PNG or JPEG bytes.
pub fn encode_raster(pixmap: &Pixmap, format: ExportFormat) -> PadResult<Vec<u8>> {
    let rgba = pixmap_to_rgba(pixmap);
    let (width, height) = rgba.dimensions();
    let mut bytes = Vec::new();

    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut bytes).write_image(
                rgba.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )
            .map_err(|err| PadError::Encode(err.to_string()))?;
        }
        ExportFormat::Jpeg => {
            let rgb = flatten_on_black(pixmap);
            JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
            .map_err(|err| PadError::Encode(err.to_string()))?;
        }
        ExportFormat::Svg => {
            return Err(PadError::Encode("svg is not a raster format".to_owned()));
        }
    }
    Ok(bytes)
}
