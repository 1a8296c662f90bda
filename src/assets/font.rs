//! Fonts and text rasterization
//!
//! A [`Font`] is either a loaded TrueType face at a pixel size, or the
//! built-in 5x7 bitmap face that stands in as the system default. Both
//! rasterize text into the same [`TextBitmap`] coverage mask, so the
//! frontend never needs to know which one it got.

use ab_glyph::{Font as _, FontArc, PxScale, ScaleFont, point};
use std::fmt;

#[derive(Clone)]
enum FontFace {
    TrueType { source: String, face: FontArc },
    SystemDefault,
}

/// A font face at a fixed pixel size
#[derive(Clone)]
pub struct Font {
    face: FontFace,
    size: u16,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.face {
            FontFace::TrueType { source, .. } => write!(f, "Font({} @ {}px)", source, self.size),
            FontFace::SystemDefault => write!(f, "Font(system default @ {}px)", self.size),
        }
    }
}

/// 8-bit coverage mask of rendered text, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBitmap {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

impl TextBitmap {
    fn blank(width: u32, height: u32) -> Self {
        TextBitmap {
            width,
            height,
            coverage: vec![0; (width * height) as usize],
        }
    }

    fn plot(&mut self, x: i32, y: i32, value: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        self.coverage[idx] = self.coverage[idx].max(value);
    }

    /// Number of pixels with any coverage
    pub fn inked_pixels(&self) -> usize {
        self.coverage.iter().filter(|&&c| c > 0).count()
    }
}

impl Font {
    pub(crate) fn true_type(source: &str, face: FontArc, size: u16) -> Self {
        Font {
            face: FontFace::TrueType {
                source: source.to_string(),
                face,
            },
            size,
        }
    }

    /// The built-in bitmap face at `size` pixels
    pub fn system_default(size: u16) -> Self {
        Font {
            face: FontFace::SystemDefault,
            size,
        }
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    /// True when this is the built-in face standing in for a failed load
    pub fn is_fallback(&self) -> bool {
        matches!(self.face, FontFace::SystemDefault)
    }

    /// Logical path of the loaded face, if any
    pub fn source(&self) -> Option<&str> {
        match &self.face {
            FontFace::TrueType { source, .. } => Some(source),
            FontFace::SystemDefault => None,
        }
    }

    pub fn rasterize(&self, text: &str) -> TextBitmap {
        match &self.face {
            FontFace::TrueType { face, .. } => rasterize_true_type(face, self.size, text),
            FontFace::SystemDefault => rasterize_bitmap(self.size, text),
        }
    }
}

fn rasterize_true_type(face: &FontArc, size: u16, text: &str) -> TextBitmap {
    let scale = PxScale::from(size.max(1) as f32);
    let scaled = face.as_scaled(scale);
    let ascent = scaled.ascent();
    let height = (ascent - scaled.descent()).ceil().max(1.0) as u32;

    let mut caret = 0.0f32;
    let mut previous = None;
    let mut glyphs = Vec::new();
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, ascent)));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    let mut bitmap = TextBitmap::blank(caret.ceil().max(1.0) as u32, height);
    for glyph in glyphs {
        if let Some(outlined) = face.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, c| {
                bitmap.plot(
                    bounds.min.x as i32 + x as i32,
                    bounds.min.y as i32 + y as i32,
                    (c.clamp(0.0, 1.0) * 255.0) as u8,
                );
            });
        }
    }
    bitmap
}

/// Pixel scale of the 5x7 face for a requested size
fn bitmap_scale(size: u16) -> u32 {
    (size as u32 / 7).max(1)
}

fn rasterize_bitmap(size: u16, text: &str) -> TextBitmap {
    let scale = bitmap_scale(size);
    let char_width = 6 * scale; // 5 pixels + 1 spacing
    let count = text.chars().count() as u32;
    let mut bitmap = TextBitmap::blank((count * char_width).max(1), 7 * scale);

    for (i, c) in text.chars().enumerate() {
        let char_x = i as u32 * char_width;
        for (row, &pattern_row) in glyph_pattern(c).iter().enumerate() {
            for col in 0..5u32 {
                if (pattern_row >> (4 - col)) & 1 == 1 {
                    for dy in 0..scale {
                        for dx in 0..scale {
                            bitmap.plot(
                                (char_x + col * scale + dx) as i32,
                                (row as u32 * scale + dy) as i32,
                                255,
                            );
                        }
                    }
                }
            }
        }
    }
    bitmap
}

/// 5x7 patterns (1 = pixel on); case-insensitive
fn glyph_pattern(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10001, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01110, 0b10001, 0b10000, 0b01110, 0b00001, 0b10001, 0b01110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10101, 0b11011, 0b10001],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ':' => [0b00000, 0b00000, 0b00100, 0b00000, 0b00100, 0b00000, 0b00000],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        ' ' => [0; 7],
        _ => [0b11111; 7], // Full block for unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_default_keeps_requested_size() {
        let font = Font::system_default(40);
        assert_eq!(font.size(), 40);
        assert!(font.is_fallback());
        assert!(font.source().is_none());
    }

    #[test]
    fn test_bitmap_dimensions_follow_size() {
        let body = Font::system_default(20).rasterize("AB");
        assert_eq!(body.height, 14);
        assert_eq!(body.width, 24);

        let title = Font::system_default(40).rasterize("AB");
        assert_eq!(title.height, 35);
        assert!(title.width > body.width);
    }

    #[test]
    fn test_space_has_no_ink() {
        let bitmap = Font::system_default(7).rasterize("   ");
        assert_eq!(bitmap.inked_pixels(), 0);
        assert_eq!(bitmap.width, 18);
    }

    #[test]
    fn test_case_insensitive_glyphs() {
        let upper = Font::system_default(14).rasterize("WIN");
        let lower = Font::system_default(14).rasterize("win");
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_empty_text_is_not_zero_sized() {
        let bitmap = Font::system_default(20).rasterize("");
        assert_eq!(bitmap.width, 1);
        assert_eq!(bitmap.inked_pixels(), 0);
    }
}
