//! Built-in 5x7 bitmap font.
//!
//! Used when no font candidate can be loaded. It has one fixed size, so the
//! layout solver stops its size search after a single attempt with it.
//! Lowercase letters are drawn as uppercase; characters without a glyph
//! advance like a space.

use super::fonts::{CaptionFont, TextBox};
use image::{Rgb, RgbImage};

/// Each font pixel is drawn as a `SCALE`×`SCALE` block.
const SCALE: u32 = 2;
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
/// One blank column between glyphs.
const ADVANCE: u32 = GLYPH_WIDTH + 1;

#[rustfmt::skip]
const GLYPHS: &[(char, [u8; 7])] = &[
    // Each row is 5 bits, leftmost pixel in bit 4
    ('A', [0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001]),
    ('B', [0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110]),
    ('C', [0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110]),
    ('D', [0b11110,0b10001,0b10001,0b10001,0b10001,0b10001,0b11110]),
    ('E', [0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111]),
    ('F', [0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000]),
    ('G', [0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111]),
    ('H', [0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001]),
    ('I', [0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110]),
    ('J', [0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100]),
    ('K', [0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001]),
    ('L', [0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111]),
    ('M', [0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001]),
    ('N', [0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001]),
    ('O', [0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110]),
    ('P', [0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000]),
    ('Q', [0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101]),
    ('R', [0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001]),
    ('S', [0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110]),
    ('T', [0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100]),
    ('U', [0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110]),
    ('V', [0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100]),
    ('W', [0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010]),
    ('X', [0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001]),
    ('Y', [0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100]),
    ('Z', [0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111]),
    ('0', [0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110]),
    ('1', [0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110]),
    ('2', [0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111]),
    ('3', [0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110]),
    ('4', [0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010]),
    ('5', [0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110]),
    ('6', [0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110]),
    ('7', [0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000]),
    ('8', [0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110]),
    ('9', [0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100]),
    ('.', [0b00000,0b00000,0b00000,0b00000,0b00000,0b01100,0b01100]),
    (',', [0b00000,0b00000,0b00000,0b00000,0b01100,0b00100,0b01000]),
    ('!', [0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100]),
    ('?', [0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100]),
    ('\'', [0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000]),
    ('"', [0b01010,0b01010,0b01010,0b00000,0b00000,0b00000,0b00000]),
    ('-', [0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000]),
    (':', [0b00000,0b01100,0b01100,0b00000,0b01100,0b01100,0b00000]),
    (';', [0b00000,0b01100,0b01100,0b00000,0b01100,0b00100,0b01000]),
    ('(', [0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010]),
    (')', [0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000]),
    ('/', [0b00000,0b00001,0b00010,0b00100,0b01000,0b10000,0b00000]),
    ('&', [0b01100,0b10010,0b10100,0b01000,0b10101,0b10010,0b01101]),
    ('#', [0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010]),
    ('=', [0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000]),
];

fn glyph_rows(ch: char) -> Option<[u8; 7]> {
    let ch = ch.to_ascii_uppercase();
    GLYPHS.iter().find(|(k, _)| *k == ch).map(|(_, rows)| *rows)
}

/// The universal fallback font. Fixed size; see the module docs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuiltinFont;

impl BuiltinFont {
    /// Rendered glyph height in pixels, whatever size was requested.
    pub const PIXEL_SIZE: u32 = GLYPH_HEIGHT * SCALE;

    pub fn new() -> Self {
        Self
    }

    fn draw_glyph(&self, canvas: &mut RgbImage, x: i32, y: i32, rows: [u8; 7], color: Rgb<u8>) {
        let (w, h) = canvas.dimensions();
        for (row_idx, row_bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (row_bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 0 {
                    continue;
                }
                let px = x + (col * SCALE) as i32;
                let py = y + (row_idx as u32 * SCALE) as i32;
                for dy in 0..SCALE as i32 {
                    for dx in 0..SCALE as i32 {
                        let (sx, sy) = (px + dx, py + dy);
                        if sx >= 0 && sy >= 0 && (sx as u32) < w && (sy as u32) < h {
                            canvas.put_pixel(sx as u32, sy as u32, color);
                        }
                    }
                }
            }
        }
    }
}

impl CaptionFont for BuiltinFont {
    fn text_bbox(&self, text: &str) -> TextBox {
        let inked: Vec<i32> = text
            .chars()
            .enumerate()
            .filter(|(_, c)| glyph_rows(*c).is_some())
            .map(|(i, _)| i as i32)
            .collect();
        let (Some(&first), Some(&last)) = (inked.first(), inked.last()) else {
            return TextBox::default();
        };
        let advance = (ADVANCE * SCALE) as i32;
        TextBox {
            left: first * advance,
            top: 0,
            right: last * advance + (GLYPH_WIDTH * SCALE) as i32,
            bottom: (GLYPH_HEIGHT * SCALE) as i32,
        }
    }

    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        let advance = (ADVANCE * SCALE) as i32;
        let mut cursor = x;
        for ch in text.chars() {
            if let Some(rows) = glyph_rows(ch) {
                self.draw_glyph(canvas, cursor, y, rows, color);
            }
            cursor += advance;
        }
    }
}
