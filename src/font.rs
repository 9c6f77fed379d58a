//! 3x5 bitmap font for the HUD.

use crate::pixels::{PixelBuf, Rgb};

pub const GLYPH_W: i32 = 3;
pub const GLYPH_H: i32 = 5;

const SHADOW: Rgb = Rgb(30, 30, 30);

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn letter(ch: char) -> Option<[u8; 15]> {
    let g = match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'B' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'D' => [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'G' => [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1],
        'I' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1],
        'L' => [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'N' => [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'P' => [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        ':' => [0,0,0, 0,1,0, 0,0,0, 0,1,0, 0,0,0],
        _ => return None,
    };
    Some(g)
}

fn glyph(ch: char) -> Option<[u8; 15]> {
    match ch.to_digit(10) {
        Some(d) => Some(DIGITS[d as usize]),
        None => letter(ch.to_ascii_uppercase()),
    }
}

/// Width in pixels of `text` drawn at `scale`: 3px per glyph plus 1px
/// spacing, without the trailing gap.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 {
        return 0;
    }
    (n * (GLYPH_W + 1) - 1) * scale
}

/// Draw `text` with its top-left corner at (x, y). Unknown characters
/// (including spaces) advance the cursor without drawing.
pub fn draw_text(buf: &mut PixelBuf, x: i32, y: i32, text: &str, fg: Rgb, scale: i32) {
    let scale = scale.max(1);
    for (i, ch) in text.chars().enumerate() {
        let Some(g) = glyph(ch) else { continue };
        let gx = x + i as i32 * (GLYPH_W + 1) * scale;
        for row in 0..GLYPH_H {
            for col in 0..GLYPH_W {
                if g[(row * GLYPH_W + col) as usize] == 1 {
                    let px = gx + col * scale;
                    let py = y + row * scale;
                    buf.fill_rect(px + 1, py + 1, scale, scale, SHADOW);
                    buf.fill_rect(px, py, scale, scale, fg);
                }
            }
        }
    }
}

/// Draw `text` horizontally centered on `cx`.
pub fn draw_text_centered(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb, scale: i32) {
    let w = text_width(text, scale.max(1));
    draw_text(buf, cx - w / 2, y, text, fg, scale);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("0", 1), 3);
        assert_eq!(text_width("12", 1), 7);
        assert_eq!(text_width("12", 2), 14);
    }

    #[test]
    fn test_hud_strings_have_glyphs() {
        for text in ["SCORE:", "BEST:", "GAME OVER", "PRESS SPACE", "0123456789"] {
            for ch in text.chars().filter(|c| *c != ' ') {
                assert!(glyph(ch).is_some(), "Missing glyph for {:?}", ch);
            }
        }
    }

    #[test]
    fn test_draw_one() {
        let white = Rgb(255, 255, 255);
        let mut buf = PixelBuf::new(8, 8);
        draw_text(&mut buf, 0, 0, "1", white, 1);
        // "1" has its top-middle pixel set and top-left clear
        assert_eq!(buf.get(1, 0), white);
        assert_ne!(buf.get(0, 0), white);
        assert_eq!(buf.get(0, 4), white, "Bottom bar spans the glyph");
    }
}
