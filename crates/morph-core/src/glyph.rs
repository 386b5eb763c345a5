//! Text rasterization seam for the glyph shape.
//!
//! The shape generator only needs a greyscale bitmap; where that bitmap comes
//! from is platform-specific. The web frontend draws into an off-screen 2D
//! canvas, the native frontend uses the built-in [`BlockFont`].

use crate::constants::{GLYPH_BITMAP_HEIGHT, GLYPH_BITMAP_WIDTH};

/// Row-major 8-bit brightness image.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub luma: Vec<u8>,
}

impl GlyphBitmap {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            luma: vec![0; (width * height) as usize],
        }
    }

    /// Build from RGBA bytes (as returned by canvas `getImageData`), keeping the red channel.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let luma = rgba.chunks_exact(4).map(|px| px[0]).collect::<Vec<_>>();
        Self {
            width,
            height,
            luma,
        }
    }

    /// Pixel coordinates whose brightness is strictly above `threshold`.
    pub fn bright_pixels(&self, threshold: u8) -> Vec<(u32, u32)> {
        let w = self.width.max(1);
        self.luma
            .iter()
            .enumerate()
            .filter(|(_, &v)| v > threshold)
            .map(|(i, _)| (i as u32 % w, i as u32 / w))
            .collect()
    }
}

/// Anything that can turn a string into a fixed-size brightness bitmap.
///
/// Returns `None` when rasterization is unavailable; the glyph generator then
/// collapses to the origin instead of failing.
pub trait GlyphRaster {
    fn rasterize(&self, text: &str) -> Option<GlyphBitmap>;
}

/// Rasterizer for platforms without any text support.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRaster;

impl GlyphRaster for NullRaster {
    fn rasterize(&self, _text: &str) -> Option<GlyphBitmap> {
        None
    }
}

const CELL_W: u32 = 5;
const CELL_H: u32 = 7;

/// Chunky 5x7 uppercase font scaled up to fill the glyph bitmap.
///
/// Lowercase input is upper-cased; characters outside the table render blank.
#[derive(Clone, Copy, Debug)]
pub struct BlockFont {
    pub width: u32,
    pub height: u32,
}

impl Default for BlockFont {
    fn default() -> Self {
        Self {
            width: GLYPH_BITMAP_WIDTH,
            height: GLYPH_BITMAP_HEIGHT,
        }
    }
}

impl GlyphRaster for BlockFont {
    fn rasterize(&self, text: &str) -> Option<GlyphBitmap> {
        let mut bitmap = GlyphBitmap::blank(self.width, self.height);
        let chars: Vec<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
        if chars.is_empty() {
            return Some(bitmap);
        }
        // one blank column between characters
        let cols = chars.len() as u32 * (CELL_W + 1) - 1;
        let scale = (self.width / cols).min(self.height / CELL_H);
        if scale == 0 {
            return Some(bitmap);
        }
        let x0 = (self.width - cols * scale) / 2;
        let y0 = (self.height - CELL_H * scale) / 2;
        for (ci, ch) in chars.iter().enumerate() {
            let Some(rows) = block_glyph(*ch) else {
                continue;
            };
            let cx = x0 + ci as u32 * (CELL_W + 1) * scale;
            for (ry, bits) in rows.iter().enumerate() {
                for rx in 0..CELL_W {
                    if bits & (1 << (CELL_W - 1 - rx)) == 0 {
                        continue;
                    }
                    let px = cx + rx * scale;
                    let py = y0 + ry as u32 * scale;
                    for dy in 0..scale {
                        let row = ((py + dy) * self.width) as usize;
                        let start = row + px as usize;
                        bitmap.luma[start..start + scale as usize].fill(255);
                    }
                }
            }
        }
        Some(bitmap)
    }
}

fn block_glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '♥' => [0x00, 0x0A, 0x1F, 0x1F, 0x0E, 0x04, 0x00],
        _ => return None,
    };
    Some(rows)
}
