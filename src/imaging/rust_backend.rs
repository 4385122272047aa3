//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, GIF) | `image::ImageReader::with_guessed_format` |
//! | Resize | `image::imageops::resize` with `Triangle` filter |
//! | Encode → JPEG | `JpegEncoder::new_with_quality` on RGB8 (alpha dropped) |
//! | Encode → PNG | `PngEncoder`, lossless, quality ignored |
//! | Encode → WebP | channel quantization + `WebPEncoder::new_lossless` |
//!
//! The `image` crate only ships a lossless WebP encoder. Lossy WebP is
//! approximated by snapping each RGB channel to a palette whose size shrinks
//! with quality before the lossless encode, which keeps the file-size/quality
//! trade-off monotonic without linking libwebp.

use super::backend::{BackendError, EncodedOutput, ImageBackend};
use super::params::{OutputFormat, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, RgbaImage};
use std::io::Cursor;
use std::sync::LazyLock;

/// Input extensions the editor accepts, paired with the decoder they need.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, BackendError> {
        if bytes.is_empty() {
            return Err(BackendError::DecodeFailed("input is empty".to_string()));
        }
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::DecodeFailed(e.to_string()))?;
        let img = reader
            .decode()
            .map_err(|e| BackendError::DecodeFailed(e.to_string()))?;
        Ok(img.to_rgba8())
    }

    fn resize(&self, raster: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        let (width, height) = (width.max(1), height.max(1));
        if raster.dimensions() == (width, height) {
            return raster.clone();
        }
        image::imageops::resize(raster, width, height, FilterType::Triangle)
    }

    fn encode(
        &self,
        raster: &RgbaImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<EncodedOutput, BackendError> {
        let (width, height) = raster.dimensions();
        if width == 0 || height == 0 {
            return Err(BackendError::EncodeFailed(format!(
                "cannot encode an empty {width}x{height} raster"
            )));
        }

        let mut buffer = Vec::new();
        match format {
            OutputFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(raster.clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut buffer, quality.percent())
                    .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| BackendError::EncodeFailed(format!("JPEG: {e}")))?;
            }
            OutputFormat::Png => {
                PngEncoder::new(&mut buffer)
                    .write_image(raster.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(|e| BackendError::EncodeFailed(format!("PNG: {e}")))?;
            }
            OutputFormat::Webp => {
                let mut pixels = raster.clone();
                quantize_rgb(&mut pixels, quality.percent());
                WebPEncoder::new_lossless(&mut buffer)
                    .write_image(pixels.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(|e| BackendError::EncodeFailed(format!("WebP: {e}")))?;
            }
        }

        if buffer.is_empty() {
            return Err(BackendError::EncodeFailed(format!(
                "{format} encoder produced no data"
            )));
        }
        Ok(EncodedOutput {
            bytes: buffer,
            format,
        })
    }
}

/// Snap RGB channels to `levels` evenly spaced values; alpha is left alone.
fn quantize_rgb(raster: &mut RgbaImage, percent: u8) {
    let levels = levels_for_quality(percent);
    if levels >= 256 {
        return;
    }
    let step = 255.0 / (levels as f32 - 1.0);
    for px in raster.pixels_mut() {
        for channel in px.0.iter_mut().take(3) {
            let bucket = (f32::from(*channel) / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Palette size per channel: 256 at 100, falling quadratically to 2 near 0.
fn levels_for_quality(percent: u8) -> u16 {
    if percent >= 100 {
        return 256;
    }
    let q = f32::from(percent.max(1)) / 100.0;
    (2.0 + q * q * 254.0).round().clamp(2.0, 256.0) as u16
}
