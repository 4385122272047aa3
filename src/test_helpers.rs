//! Shared test utilities for the imgpress test suite.
//!
//! Fixture builders that produce real encoded images and archives in memory,
//! so tests never depend on files checked into the repository.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let png = solid_png(100, 100);
//! let source = SourceImage::new("red.png", png);
//! let archive = zip_of(&[("a.png", &solid_png(4, 4))]);
//! ```

use crate::source::SourceImage;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::{Cursor, Write};

// =========================================================================
// Encoded image fixtures
// =========================================================================

/// Encode `raster` as `format` in memory.
pub fn encode_as(raster: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(raster.clone())
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

/// A PNG filled with opaque red.
pub fn solid_png(width: u32, height: u32) -> Vec<u8> {
    colored_png(width, height, [255, 0, 0, 255])
}

/// A PNG filled with one RGBA color.
pub fn colored_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    encode_as(
        &RgbaImage::from_pixel(width, height, Rgba(rgba)),
        ImageFormat::Png,
    )
}

/// A PNG whose pixels encode their own coordinates: `(x, y, 0, 255)`.
pub fn coordinate_png(width: u32, height: u32) -> Vec<u8> {
    let raster = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]));
    encode_as(&raster, ImageFormat::Png)
}

/// A named source image holding a solid red PNG.
pub fn red_source(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage::new(name, solid_png(width, height))
}

/// A named source with bytes that no decoder will accept.
pub fn corrupt_source(name: &str) -> SourceImage {
    SourceImage::new(name, b"\x89PNG\r\n\x1a\nthis is not a png body".to_vec())
}

// =========================================================================
// Archive fixtures
// =========================================================================

/// Build a deflated ZIP from `(name, bytes)` entries.
pub fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Entry names of a ZIP, in archive order.
pub fn zip_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}
