//! Anchored crop extraction.
//!
//! The requested rectangle is first re-expressed against its [`Anchor`]
//! (see [`anchored_origin`]), then copied row by row into a freshly allocated
//! raster of exactly the requested size. Any part of the request that falls
//! outside the source stays fully transparent black in the output.

use super::calculations::{anchored_origin, clamp_read_window};
use super::params::{Anchor, CropRegion};
use image::RgbaImage;

const CHANNELS: usize = 4;

/// Extract `region` (interpreted against `anchor`) from `source`.
///
/// The output is always `region.width × region.height`.
pub fn extract_crop(source: &RgbaImage, region: &CropRegion, anchor: Anchor) -> RgbaImage {
    let size = (region.width.max(1), region.height.max(1));
    let mut out = RgbaImage::new(size.0, size.1);

    let origin = anchored_origin(source.dimensions(), region, anchor);
    let Some(win) = clamp_read_window(source.dimensions(), origin, size) else {
        return out;
    };

    let src_stride = source.width() as usize * CHANNELS;
    let dst_stride = size.0 as usize * CHANNELS;
    let row_len = win.width as usize * CHANNELS;
    let src = source.as_raw();
    let dst: &mut [u8] = &mut out;

    for row in 0..win.height as usize {
        let s = (win.src_y as usize + row) * src_stride + win.src_x as usize * CHANNELS;
        let d = (win.dst_y as usize + row) * dst_stride + win.dst_x as usize * CHANNELS;
        dst[d..d + row_len].copy_from_slice(&src[s..s + row_len]);
    }

    out
}
