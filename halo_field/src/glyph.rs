//! Glyph-to-target sampling.
//!
//! A message is rasterized centered into a private off-screen alpha mask with
//! the crate's 5×7 bitmap font, then read back on a coarse regular grid; grid
//! cells landing on glyph ink become convergence targets.  The mask is a
//! probe owned by the sampler — the drawing surface proper is never touched.

/// Glyph cell grid: 5 columns × 7 rows per character.
pub const GLYPH_COLS: usize = 5;
pub const GLYPH_ROWS: usize = 7;

/// Horizontal advance in cells (one blank column between characters).
const ADVANCE_CELLS: usize = GLYPH_COLS + 1;

/// Nominal rendered glyph height in device pixels.
pub const MASK_FONT_PX: usize = 48;

/// Grid stride for alpha readback, device pixels per axis.
pub const SAMPLE_STRIDE: usize = 6;

/// A grid sample becomes a target iff its alpha exceeds this (0–255 scale).
pub const ALPHA_THRESHOLD: u8 = 150;

// ════════════════════════════════════════════════════════════════════════════
// TargetPoint
// ════════════════════════════════════════════════════════════════════════════

/// A sampled location inside rendered glyph ink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetPoint {
    pub x: f32,
    pub y: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// sample — the public contract
// ════════════════════════════════════════════════════════════════════════════

/// Rasterize `text` centered in a `width` × `height` mask and return every
/// grid sample that lands on glyph ink.
///
/// Returns an empty set for degenerate input (blank text, zero-sized
/// surface); callers must treat that as "no targets available" and skip the
/// convergence transition.
pub fn sample(text: &str, width: usize, height: usize) -> Vec<TargetPoint> {
    if text.trim().is_empty() || width == 0 || height == 0 {
        return Vec::new();
    }

    let cell = MASK_FONT_PX / GLYPH_ROWS;
    let mut mask = GlyphMask::new(width, height);
    mask.render_centered(text, cell);

    let mut targets = Vec::new();
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            if mask.alpha_at(x, y) > ALPHA_THRESHOLD {
                targets.push(TargetPoint { x: x as f32, y: y as f32 });
            }
            x += SAMPLE_STRIDE;
        }
        y += SAMPLE_STRIDE;
    }

    tracing::debug!(text, targets = targets.len(), "glyph sample");
    targets
}

// ════════════════════════════════════════════════════════════════════════════
// GlyphMask — off-screen alpha buffer
// ════════════════════════════════════════════════════════════════════════════

struct GlyphMask {
    width:  usize,
    height: usize,
    alpha:  Vec<u8>,
}

impl GlyphMask {
    fn new(width: usize, height: usize) -> Self {
        GlyphMask { width, height, alpha: vec![0; width * height] }
    }

    fn alpha_at(&self, x: usize, y: usize) -> u8 {
        self.alpha[y * self.width + x]
    }

    /// Render `text` centered on both axes, `cell` device pixels per font
    /// cell.  Cells are double-struck one pixel to the right for a bolder
    /// silhouette.  Off-surface cells are clipped.
    fn render_centered(&mut self, text: &str, cell: usize) {
        let n = text.chars().count();
        let (px_w, px_h) = text_block_px(n, cell);
        let x0 = (self.width as isize - px_w as isize) / 2;
        let y0 = (self.height as isize - px_h as isize) / 2;

        for (i, ch) in text.chars().enumerate() {
            let rows = glyph_rows(ch);
            for (row, &bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_COLS {
                    if bits & (1 << (GLYPH_COLS - 1 - col)) != 0 {
                        let bx = x0 + ((i * ADVANCE_CELLS + col) * cell) as isize;
                        let by = y0 + (row * cell) as isize;
                        self.fill_block(bx, by, cell + 1, cell);
                    }
                }
            }
        }
    }

    fn fill_block(&mut self, x: isize, y: isize, w: usize, h: usize) {
        for row in y.max(0)..(y + h as isize).min(self.height as isize) {
            for col in x.max(0)..(x + w as isize).min(self.width as isize) {
                self.alpha[row as usize * self.width + col as usize] = 255;
            }
        }
    }
}

/// Pixel dimensions of an `n`-character line (trailing inter-glyph gap
/// trimmed).
fn text_block_px(n: usize, cell: usize) -> (usize, usize) {
    if n == 0 {
        return (0, GLYPH_ROWS * cell);
    }
    ((n * ADVANCE_CELLS - 1) * cell, GLYPH_ROWS * cell)
}

// ════════════════════════════════════════════════════════════════════════════
// 5×7 bitmap font
// ════════════════════════════════════════════════════════════════════════════

/// Row bitmap for one character, 5 bits wide, MSB = leftmost column.
/// Characters outside the repertoire fall back to a centered mark so
/// arbitrary input still yields ink.
pub fn glyph_rows(c: char) -> [u8; GLYPH_ROWS] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b01000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b01110, 0b00000, 0b00000, 0b00000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        ' ' => [0b00000; GLYPH_ROWS],
        _   => [0b00000, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000, 0b00000],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_in_camera_frame_is_nonempty_and_bounded() {
        let (w, h) = (640, 480);
        let targets = sample("OK", w, h);
        assert!(!targets.is_empty());

        let cell = MASK_FONT_PX / GLYPH_ROWS;
        let (px_w, px_h) = text_block_px(2, cell);
        let x0 = (w as isize - px_w as isize) / 2;
        let y0 = (h as isize - px_h as isize) / 2;
        for t in &targets {
            // +1 on the right edge for the bold double-strike.
            assert!(t.x as isize >= x0 && (t.x as isize) <= x0 + px_w as isize + 1);
            assert!(t.y as isize >= y0 && (t.y as isize) < y0 + px_h as isize);
        }
    }

    #[test]
    fn samples_lie_on_the_stride_grid() {
        for t in sample("HALO", 640, 480) {
            assert_eq!(t.x as usize % SAMPLE_STRIDE, 0);
            assert_eq!(t.y as usize % SAMPLE_STRIDE, 0);
        }
    }

    #[test]
    fn blank_text_yields_no_targets() {
        assert!(sample("", 640, 480).is_empty());
        assert!(sample("   ", 640, 480).is_empty());
    }

    #[test]
    fn zero_surface_yields_no_targets() {
        assert!(sample("OK", 0, 480).is_empty());
        assert!(sample("OK", 640, 0).is_empty());
    }

    #[test]
    fn unsupported_characters_still_yield_ink() {
        // Fallback mark keeps the non-empty guarantee for odd input.
        assert!(!sample("~~~", 640, 480).is_empty());
    }

    #[test]
    fn wider_message_yields_more_targets() {
        let short = sample("HI", 1200, 700).len();
        let long = sample("HI THERE", 1200, 700).len();
        assert!(long > short);
    }

    #[test]
    fn every_cell_of_a_glyph_is_sampled() {
        // With cell == stride (48 / 7 == 6), each lit font cell spans one
        // full stride step, so "I" (11 lit cells) yields at least 11 targets.
        let targets = sample("I", 640, 480);
        assert!(targets.len() >= 11, "got {}", targets.len());
    }
}
