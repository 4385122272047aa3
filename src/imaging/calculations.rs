//! Pure calculation functions for image dimensions and overlay layout.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{Anchor, AspectRatio, Corner, CropRegion, ScalePercent};

/// Calculate the output dimensions for a scale percentage.
///
/// Each edge is floored and then raised to at least 1, so a tiny source at
/// 10% never collapses to a zero-area raster.
///
/// # Examples
/// ```
/// # use imgpress::imaging::{ScalePercent, scaled_dimensions};
/// assert_eq!(scaled_dimensions((100, 100), ScalePercent::new(50)), (50, 50));
/// assert_eq!(scaled_dimensions((5, 3), ScalePercent::new(10)), (1, 1));
/// ```
pub fn scaled_dimensions(natural: (u32, u32), scale: ScalePercent) -> (u32, u32) {
    let (w, h) = natural;
    let factor = scale.factor();
    let scale_edge = |edge: u32| ((edge as f64 * factor).floor() as u32).max(1);
    (scale_edge(w), scale_edge(h))
}

/// Resolve where a crop rectangle starts in the source, given its anchor.
///
/// The result may be negative or run past the far edge when the request does
/// not fit; [`clamp_read_window`] deals with that.
///
/// - `TopLeft`: `(x, y)` unchanged
/// - `TopRight`: `x` measured from the right edge
/// - `BottomLeft`: `y` measured from the bottom edge
/// - `BottomRight`: both measured from the far edges
/// - `Center`: `(x, y)` ignored, rectangle centered
pub fn anchored_origin(source: (u32, u32), region: &CropRegion, anchor: Anchor) -> (i64, i64) {
    let (src_w, src_h) = (source.0 as i64, source.1 as i64);
    let (x, y) = (region.x as i64, region.y as i64);
    let (w, h) = (region.width as i64, region.height as i64);

    match anchor {
        Anchor::TopLeft => (x, y),
        Anchor::TopRight => (src_w - w - x, y),
        Anchor::BottomLeft => (x, src_h - h - y),
        Anchor::BottomRight => (src_w - w - x, src_h - h - y),
        Anchor::Center => ((src_w - w).div_euclid(2), (src_h - h).div_euclid(2)),
    }
}

/// The in-bounds part of a crop read, in both source and destination coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWindow {
    pub src_x: u32,
    pub src_y: u32,
    pub dst_x: u32,
    pub dst_y: u32,
    pub width: u32,
    pub height: u32,
}

/// Intersect a `size`-sized read starting at `origin` with the source bounds.
///
/// Returns `None` when the read lies entirely outside the source.
pub fn clamp_read_window(
    source: (u32, u32),
    origin: (i64, i64),
    size: (u32, u32),
) -> Option<ReadWindow> {
    let clamp_axis = |start: i64, len: u32, bound: u32| -> Option<(u32, u32, u32)> {
        let lo = start.max(0);
        let hi = (start + len as i64).min(bound as i64);
        if hi <= lo {
            return None;
        }
        Some((lo as u32, (lo - start) as u32, (hi - lo) as u32))
    };

    let (src_x, dst_x, width) = clamp_axis(origin.0, size.0, source.0)?;
    let (src_y, dst_y, height) = clamp_axis(origin.1, size.1, source.1)?;
    Some(ReadWindow {
        src_x,
        src_y,
        dst_x,
        dst_y,
        width,
        height,
    })
}

/// Derive a crop rectangle for an aspect-ratio preset.
///
/// The rectangle starts 5% in from the top-left and spans 90% of the width;
/// if the height that ratio implies exceeds 90% of the raster, the height is
/// capped instead and the width follows from it.
pub fn aspect_crop(dims: (u32, u32), aspect: AspectRatio) -> CropRegion {
    let (w, h) = (dims.0 as f64, dims.1 as f64);
    let ratio = aspect.ratio();

    let mut crop_w = w * 0.9;
    let mut crop_h = crop_w / ratio;
    if crop_h > h * 0.9 {
        crop_h = h * 0.9;
        crop_w = crop_h * ratio;
    }

    CropRegion::new(
        (w * 0.05).floor() as u32,
        (h * 0.05).floor() as u32,
        crop_w.round() as u32,
        crop_h.round() as u32,
    )
}

/// Watermark font size: `max(12, min(w, h) / 20)`.
pub fn watermark_font_size(dims: (u32, u32)) -> f32 {
    (short_edge(dims) / 20.0).max(12.0)
}

/// Distance between neighbouring watermark tiles: `min(w, h) / 3`.
pub fn watermark_spacing(dims: (u32, u32)) -> f32 {
    short_edge(dims) / 3.0
}

/// Padding and font size for the copyright caption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionMetrics {
    /// 2% of the short edge.
    pub padding: f32,
    /// `max(12, 3%)` of the short edge.
    pub font_size: f32,
}

pub fn caption_metrics(dims: (u32, u32)) -> CaptionMetrics {
    let short = short_edge(dims);
    CaptionMetrics {
        padding: short * 0.02,
        font_size: (short * 0.03).max(12.0),
    }
}

/// Top-left of the caption's text box for a corner.
///
/// Near edges sit `padding` from the raster edge; far edges subtract the text
/// extent plus `padding` from the raster dimension.
pub fn caption_origin(
    dims: (u32, u32),
    text_size: (f32, f32),
    padding: f32,
    corner: Corner,
) -> (f32, f32) {
    let (w, h) = (dims.0 as f32, dims.1 as f32);
    let (text_w, text_h) = text_size;
    let far_x = w - text_w - padding;
    let far_y = h - text_h - padding;

    match corner {
        Corner::TopLeft => (padding, padding),
        Corner::TopRight => (far_x, padding),
        Corner::BottomLeft => (padding, far_y),
        Corner::BottomRight => (far_x, far_y),
    }
}

fn short_edge(dims: (u32, u32)) -> f32 {
    dims.0.min(dims.1) as f32
}
