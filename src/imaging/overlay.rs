//! Watermark and copyright overlays.
//!
//! Both passes draw onto an already-sized raster and never change its
//! dimensions. The pipeline runs the watermark first, then the copyright
//! caption, so the caption always sits on top.
//!
//! ## Watermark
//!
//! The text is stamped on a 7×7 grid (steps −3..=3 on each axis) centered on
//! the raster, spaced `min(w, h) / 3` apart, with the whole grid rotated −30°
//! about the center. Ink is 80% white over a 50% black drop shadow offset by
//! `font_size / 8` and blurred by `font_size / 4`.
//!
//! ## Copyright caption
//!
//! `"© " + text` is drawn once in solid white over a 70% black box that
//! extends `padding` beyond the text on every side. See
//! [`caption_origin`](super::calculations::caption_origin) for corner placement.

use super::calculations::{
    caption_metrics, caption_origin, watermark_font_size, watermark_spacing,
};
use super::params::Corner;
use super::text::{measure_text, render_text};
use image::{GrayImage, Luma, RgbaImage};

/// Grid extends this many tiles either side of the center tile.
const WATERMARK_PATTERN: i32 = 3;
const WATERMARK_ANGLE_DEG: f32 = -30.0;

#[derive(Debug, Clone, Copy)]
struct Paint {
    rgb: [u8; 3],
    opacity: f32,
}

const WATERMARK_INK: Paint = Paint {
    rgb: [255, 255, 255],
    opacity: 0.8,
};
const WATERMARK_SHADOW: Paint = Paint {
    rgb: [0, 0, 0],
    opacity: 0.5,
};
const CAPTION_BACKGROUND: Paint = Paint {
    rgb: [0, 0, 0],
    opacity: 0.7,
};
const CAPTION_INK: Paint = Paint {
    rgb: [255, 255, 255],
    opacity: 1.0,
};

/// Draw `text` as a rotated, tiled, translucent watermark across `raster`.
///
/// Empty text is a no-op.
pub fn draw_watermark(raster: &mut RgbaImage, text: &str) {
    if text.is_empty() {
        return;
    }
    let dims = raster.dimensions();
    let font_size = watermark_font_size(dims);
    let spacing = watermark_spacing(dims);

    let glyphs = render_text(text, font_size);
    let coverage = tiled_coverage(dims, &glyphs, spacing);
    let offset = (font_size / 8.0).round() as i64;
    let shadow = image::imageops::blur(&shifted(&coverage, offset), font_size / 8.0);

    composite_mask(raster, &shadow, (0, 0), WATERMARK_SHADOW);
    composite_mask(raster, &coverage, (0, 0), WATERMARK_INK);
}

/// Draw `"© " + text` in `corner` over a dark backing box.
///
/// Empty text is a no-op.
pub fn draw_copyright(raster: &mut RgbaImage, text: &str, corner: Corner) {
    if text.is_empty() {
        return;
    }
    let dims = raster.dimensions();
    let metrics = caption_metrics(dims);
    let caption = format!("\u{a9} {text}");
    let (text_w, text_h) = measure_text(&caption, metrics.font_size);
    let (x, y) = caption_origin(dims, (text_w, text_h), metrics.padding, corner);

    let p = metrics.padding;
    fill_rect(
        raster,
        (x - p, y - p),
        (text_w + p * 2.0, text_h + p * 2.0),
        CAPTION_BACKGROUND,
    );

    // Glyph cells start at the text box's top edge. The bitmap font's
    // baseline is its seventh row, so it lands about 7/8 down the box.
    let glyphs = render_text(&caption, metrics.font_size);
    let origin = (x.round() as i64, y.round() as i64);
    composite_mask(raster, &glyphs, origin, CAPTION_INK);
}

/// Coverage of the rotated watermark grid at every raster pixel.
fn tiled_coverage(dims: (u32, u32), glyphs: &GrayImage, spacing: f32) -> GrayImage {
    let (w, h) = dims;
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let (sin, cos) = WATERMARK_ANGLE_DEG.to_radians().sin_cos();
    let (mask_w, mask_h) = (glyphs.width() as f32, glyphs.height() as f32);
    let (half_w, half_h) = (mask_w / 2.0, mask_h / 2.0);
    let spacing = spacing.max(1.0);

    // Tile indices whose text box contains grid coordinate `t`.
    let tiles = |t: f32, half: f32| {
        let lo = ((t - half) / spacing).ceil() as i32;
        let hi = ((t + half) / spacing).floor() as i32;
        lo.max(-WATERMARK_PATTERN)..=hi.min(WATERMARK_PATTERN)
    };

    GrayImage::from_fn(w, h, |x, y| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        // Undo the grid rotation to land in text space.
        let u = dx * cos + dy * sin;
        let v = -dx * sin + dy * cos;

        let mut best = 0u8;
        for i in tiles(u, half_w) {
            let mx = u - i as f32 * spacing + half_w;
            if !(0.0..mask_w).contains(&mx) {
                continue;
            }
            for j in tiles(v, half_h) {
                let my = v - j as f32 * spacing + half_h;
                if !(0.0..mask_h).contains(&my) {
                    continue;
                }
                best = best.max(glyphs.get_pixel(mx as u32, my as u32)[0]);
            }
        }
        Luma([best])
    })
}

/// `mask` translated by `offset` pixels right and down; vacated pixels are empty.
fn shifted(mask: &GrayImage, offset: i64) -> GrayImage {
    let (w, h) = mask.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let sx = x as i64 - offset;
        let sy = y as i64 - offset;
        if sx < 0 || sy < 0 || sx >= w as i64 || sy >= h as i64 {
            Luma([0])
        } else {
            *mask.get_pixel(sx as u32, sy as u32)
        }
    })
}

/// Composite `paint` through `mask` placed with its top-left at `origin`.
fn composite_mask(raster: &mut RgbaImage, mask: &GrayImage, origin: (i64, i64), paint: Paint) {
    let (w, h) = (raster.width() as i64, raster.height() as i64);
    for (mx, my, m) in mask.enumerate_pixels() {
        if m[0] == 0 {
            continue;
        }
        let x = origin.0 + mx as i64;
        let y = origin.1 + my as i64;
        if x < 0 || y < 0 || x >= w || y >= h {
            continue;
        }
        let alpha = paint.opacity * m[0] as f32 / 255.0;
        blend_pixel(raster, x as u32, y as u32, paint.rgb, alpha);
    }
}

/// Fill an axis-aligned rectangle, clipped to the raster.
fn fill_rect(raster: &mut RgbaImage, origin: (f32, f32), size: (f32, f32), paint: Paint) {
    let (w, h) = (raster.width() as f32, raster.height() as f32);
    let x0 = origin.0.round().clamp(0.0, w) as u32;
    let y0 = origin.1.round().clamp(0.0, h) as u32;
    let x1 = (origin.0 + size.0).round().clamp(0.0, w) as u32;
    let y1 = (origin.1 + size.1).round().clamp(0.0, h) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(raster, x, y, paint.rgb, paint.opacity);
        }
    }
}

/// Source-over blend of a straight-alpha color onto one pixel.
fn blend_pixel(raster: &mut RgbaImage, x: u32, y: u32, rgb: [u8; 3], alpha: f32) {
    let dst = raster.get_pixel_mut(x, y);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = alpha + dst_a * (1.0 - alpha);
    if out_a <= 0.0 {
        return;
    }
    for c in 0..3 {
        let src_c = rgb[c] as f32;
        let dst_c = dst[c] as f32;
        let v = (src_c * alpha + dst_c * dst_a * (1.0 - alpha)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
