//! Per-pixel color filters.
//!
//! Filters rewrite the RGB channels of an existing raster in place; alpha is
//! never touched and no second buffer is allocated, so large images do not
//! double their memory footprint.
//!
//! | Filter | Per-pixel transform |
//! |---|---|
//! | `none` | no-op |
//! | `grayscale` | `Y = 0.2989R + 0.5870G + 0.1140B` (BT.601 luma) into R, G and B |
//! | `sepia` | fixed 3×3 matrix, each channel clamped to 255 |

use super::params::FilterKind;
use image::RgbaImage;

const LUMA: [f32; 3] = [0.2989, 0.5870, 0.1140];

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Apply `kind` to every pixel of `raster`, in place.
pub fn apply_filter(raster: &mut RgbaImage, kind: FilterKind) {
    match kind {
        FilterKind::None => {}
        FilterKind::Grayscale => for_each_rgb(raster, grayscale),
        FilterKind::Sepia => for_each_rgb(raster, sepia),
    }
}

fn for_each_rgb(raster: &mut RgbaImage, f: impl Fn([f32; 3]) -> [f32; 3]) {
    for px in raster.pixels_mut() {
        let rgb = [px[0] as f32, px[1] as f32, px[2] as f32];
        let out = f(rgb);
        px[0] = to_channel(out[0]);
        px[1] = to_channel(out[1]);
        px[2] = to_channel(out[2]);
    }
}

fn grayscale(rgb: [f32; 3]) -> [f32; 3] {
    let y = dot(LUMA, rgb);
    [y, y, y]
}

fn sepia(rgb: [f32; 3]) -> [f32; 3] {
    [dot(SEPIA[0], rgb), dot(SEPIA[1], rgb), dot(SEPIA[2], rgb)]
}

#[inline]
fn dot(weights: [f32; 3], rgb: [f32; 3]) -> f32 {
    weights[0] * rgb[0] + weights[1] * rgb[1] + weights[2] * rgb[2]
}

#[inline]
fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
