//! Bitmap text rasterization for overlays.
//!
//! Text is drawn from the 8×8 `font8x8` glyph set, scaled with
//! nearest-neighbour sampling so one glyph cell is `font_size` pixels tall.
//! The result is a coverage mask (`Luma<u8>`, 255 = ink) that the overlay
//! passes composite in whatever color, rotation or shadow they need. Having no
//! font files keeps rendering identical on every machine.
//!
//! Characters outside the Basic Latin and Latin-1 blocks render as `?`.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{GrayImage, Luma};

const CELL: u32 = 8;

/// Pixel extent of `text` at `font_size`, without rasterizing it.
pub fn measure_text(text: &str, font_size: f32) -> (f32, f32) {
    let chars = text.chars().count() as f32;
    (chars * font_size, font_size)
}

/// Rasterize `text` into a coverage mask sized by [`measure_text`] (rounded up).
pub fn render_text(text: &str, font_size: f32) -> GrayImage {
    let font_size = font_size.max(1.0);
    let glyphs: Vec<[u8; 8]> = text.chars().map(glyph).collect();
    let (w, h) = measure_text(text, font_size);
    let (w, h) = ((w.ceil() as u32).max(1), (h.ceil() as u32).max(1));
    let scale = font_size / CELL as f32;

    GrayImage::from_fn(w, h, |x, y| {
        let cell = (x as f32 / font_size) as usize;
        let Some(rows) = glyphs.get(cell) else {
            return Luma([0]);
        };
        let gx = (((x as f32 - cell as f32 * font_size) / scale) as u32).min(CELL - 1);
        let gy = ((y as f32 / scale) as u32).min(CELL - 1);
        // font8x8 stores the leftmost pixel in bit 0.
        if (rows[gy as usize] >> gx) & 1 == 1 {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}
