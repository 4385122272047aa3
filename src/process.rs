//! The per-image transform pipeline.
//!
//! Takes one [`SourceImage`] and a [`TransformOptions`] bundle and returns the
//! encoded result together with the dimensions before and after. Options are
//! read-only for the whole run; nothing here keeps state between calls.
//!
//! ## Stages
//!
//! ```text
//! decode → resize → [crop] → [filter] → [watermark] → [copyright] → encode
//! ```
//!
//! | Stage | Runs when | Notes |
//! |---|---|---|
//! | Decode | always | Format sniffed from the bytes; the name only gates the extension check |
//! | Resize | always | `max(1, floor(natural × scale))` per edge, even at 100% |
//! | Crop | `options.crop` is set | Anchored against the *resized* raster |
//! | Filter | filter ≠ `none` | In place |
//! | Watermark | non-empty text | |
//! | Copyright | non-empty text | Drawn last so it sits above the watermark |
//! | Encode | always | Zero-byte output is an error |
//!
//! Any failing stage aborts the run for this image; a partially built raster
//! is never returned as output.

use crate::imaging::{
    BackendError, CropRegion, CropRequest, CropSpec, Dimensions, EncodedOutput, ImageBackend,
    RustBackend, TransformOptions, apply_filter, aspect_crop, draw_copyright, draw_watermark,
    extract_crop, scaled_dimensions,
};
use crate::source::SourceImage;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Decode failed: {0}")]
    DecodeFailed(String),
    #[error("Encode failed: {0}")]
    EncodeFailed(String),
}

impl From<BackendError> for ProcessError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::DecodeFailed(msg) => Self::DecodeFailed(msg),
            BackendError::EncodeFailed(msg) => Self::EncodeFailed(msg),
        }
    }
}

impl ProcessError {
    /// Human-readable banner text for this failure.
    pub fn status_message(&self) -> String {
        let reason = match self {
            Self::InvalidInput(_) => "Invalid file type. Please select an image file.",
            Self::DecodeFailed(_) => {
                "Failed to load image. The file might be corrupted or not a valid image."
            }
            Self::EncodeFailed(_) => "Failed to create compressed image",
        };
        format!("Error processing file: {reason}")
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Natural dimensions of the decoded source.
    pub original_dimensions: Dimensions,
    /// Dimensions of the encoded output.
    pub dimensions: Dimensions,
    /// Encoded size of the source in bytes.
    pub original_size: usize,
    pub output: EncodedOutput,
}

/// Run the pipeline with the default [`RustBackend`].
pub fn process(
    source: &SourceImage,
    options: &TransformOptions,
) -> Result<ProcessedImage, ProcessError> {
    process_with_backend(&RustBackend::new(), source, options)
}

/// Run the pipeline using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    source: &SourceImage,
    options: &TransformOptions,
) -> Result<ProcessedImage, ProcessError> {
    if !source.is_supported() {
        return Err(ProcessError::InvalidInput(format!(
            "{} is not a supported image type",
            source.name
        )));
    }
    if source.bytes.is_empty() {
        return Err(ProcessError::InvalidInput(format!("{} is empty", source.name)));
    }

    let decoded = backend.decode(&source.bytes)?;
    let original_dimensions = Dimensions::from(decoded.dimensions());
    debug!(name = %source.name, dims = %original_dimensions, "decoded");

    let (width, height) = scaled_dimensions(decoded.dimensions(), options.scale);
    let mut raster = backend.resize(&decoded, width, height);
    drop(decoded);
    debug!(name = %source.name, width, height, scale = options.scale.value(), "resized");

    if let Some(crop) = &options.crop {
        let region = resolve_crop(crop, raster.dimensions());
        raster = extract_crop(&raster, &region, crop.anchor);
        debug!(name = %source.name, ?region, anchor = %crop.anchor, "cropped");
    }

    apply_filter(&mut raster, options.filter);

    if let Some(text) = options.watermark_text() {
        draw_watermark(&mut raster, text);
        debug!(name = %source.name, "watermarked");
    }
    if let Some(caption) = options.copyright_caption() {
        draw_copyright(&mut raster, &caption.text, caption.corner);
        debug!(name = %source.name, corner = %caption.corner, "captioned");
    }

    let dimensions = Dimensions::from(raster.dimensions());
    let output = backend.encode(&raster, options.format, options.quality)?;
    if output.is_empty() {
        return Err(ProcessError::EncodeFailed(format!(
            "{} encoded to zero bytes",
            source.name
        )));
    }
    debug!(
        name = %source.name,
        format = %options.format,
        bytes = output.len(),
        "encoded"
    );

    Ok(ProcessedImage {
        original_dimensions,
        dimensions,
        original_size: source.size(),
        output,
    })
}

/// Turn a crop request into a concrete rectangle on a raster of `dims`.
fn resolve_crop(crop: &CropRequest, dims: (u32, u32)) -> CropRegion {
    match crop.spec {
        CropSpec::Region(region) => region,
        CropSpec::Aspect(ratio) => aspect_crop(dims, ratio),
    }
}
