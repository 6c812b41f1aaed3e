//! A tiny 3x5 pixel font for debug labels.
//!
//! Only the characters that appear in chunk keys are covered: digits, minus,
//! comma and space. Anything else advances the pen without drawing.

pub const GLYPH_WIDTH: i64 = 3;
pub const GLYPH_HEIGHT: i64 = 5;
/// Horizontal distance between glyph origins, in unscaled pixels.
pub const GLYPH_ADVANCE: i64 = 4;

/// Rows of a glyph, top to bottom; bit 2 is the leftmost column.
pub fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ' ' => [0b000; 5],
        _ => return None,
    };
    Some(rows)
}

/// Offsets of the lit pixels of `text`, laid out left to right at `scale`.
pub fn text_pixels(text: &str, scale: i64) -> impl Iterator<Item = (i64, i64)> + '_ {
    text.chars().enumerate().flat_map(move |(i, c)| {
        let origin = i as i64 * GLYPH_ADVANCE * scale;
        let rows = glyph(c).unwrap_or([0; 5]);
        (0..GLYPH_HEIGHT).flat_map(move |row| {
            let bits = rows[row as usize];
            (0..GLYPH_WIDTH)
                .filter(move |&col| bits & (0b100u8 >> col) != 0)
                .flat_map(move |col| {
                    (0..scale).flat_map(move |sy| {
                        (0..scale).map(move |sx| {
                            (origin + col * scale + sx, row * scale + sy)
                        })
                    })
                })
        })
    })
}
