//! Image transforms: pure Rust, no system libraries.
//!
//! | Stage | Module / function |
//! |---|---|
//! | **Decode** | [`ImageBackend::decode`] (`image` crate, format sniffed) |
//! | **Resize** | [`scaled_dimensions`] + [`ImageBackend::resize`] |
//! | **Crop** | [`extract_crop`] (anchored, transparent overflow) |
//! | **Filter** | [`apply_filter`] (grayscale / sepia, in place) |
//! | **Watermark** | [`draw_watermark`] (rotated 7×7 tile grid) |
//! | **Copyright** | [`draw_copyright`] (corner caption on a dark box) |
//! | **Encode** | [`ImageBackend::encode`] (WebP / JPEG / PNG) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and placement math (unit testable)
//! - **Parameters**: Data structures describing what to do to an image
//! - **Raster passes**: crop, filter, text and overlay, all on `RgbaImage`
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod crop;
mod filter;
mod overlay;
mod params;
pub mod rust_backend;
mod text;

pub use backend::{BackendError, Dimensions, EncodedOutput, ImageBackend};
pub use calculations::{aspect_crop, caption_metrics, caption_origin, scaled_dimensions};
pub use crop::extract_crop;
pub use filter::apply_filter;
pub use overlay::{draw_copyright, draw_watermark};
pub use params::{
    Anchor, AspectRatio, Copyright, Corner, CropRegion, CropRequest, CropSpec, FilterKind,
    OutputFormat, Quality, ScalePercent, TransformOptions,
};
pub use rust_backend::{RustBackend, supported_input_extensions};
