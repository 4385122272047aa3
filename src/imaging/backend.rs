//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the three operations that touch codecs or
//! resampling: decode, resize and encode. Everything between them (crop,
//! filter, overlays) works directly on an in-memory [`RgbaImage`] and is the
//! same for every backend.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust codecs.

use super::params::{OutputFormat, Quality};
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    DecodeFailed(String),
    #[error("Encode failed: {0}")]
    EncodeFailed(String),
}

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An encoded image ready to be written or archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

impl EncodedOutput {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }
}

/// Trait for image codec backends.
///
/// Implementations must be `Sync` so a single backend can be shared by
/// reference across a batch run.
pub trait ImageBackend: Sync {
    /// Decode an encoded image (format sniffed from its bytes) into RGBA8.
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, BackendError>;

    /// Resample `raster` to exactly `width × height` (each at least 1).
    fn resize(&self, raster: &RgbaImage, width: u32, height: u32) -> RgbaImage;

    /// Encode `raster` as `format`. `quality` is ignored by lossless formats.
    fn encode(
        &self,
        raster: &RgbaImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<EncodedOutput, BackendError>;
}
