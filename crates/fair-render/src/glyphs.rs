//! 5x7 bitmap glyphs for the few characters the heatmap needs.

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;

/// Rows top to bottom; bit 4 is the leftmost column.
pub fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'c' => [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110],
        'o' => [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'r' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000],
        'e' => [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        _ => return None,
    };
    Some(rows)
}

/// Lit pixel offsets `(col, row)` of a glyph.
pub fn lit_pixels(c: char) -> impl Iterator<Item = (u32, u32)> {
    glyph(c).into_iter().flat_map(|rows| {
        rows.into_iter().zip(0_u32..).flat_map(|(bits, row)| {
            (0..GLYPH_WIDTH)
                .filter(move |col| bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0)
                .map(move |col| (col, row))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_f_has_full_top_bar() {
        let top: Vec<u32> = lit_pixels('F').filter(|(_, r)| *r == 0).map(|(c, _)| c).collect();
        assert_eq!(top, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn colorbar_label_is_covered() {
        assert!("Score".chars().all(|c| glyph(c).is_some()));
    }

    #[test]
    fn unknown_characters_draw_nothing() {
        assert_eq!(lit_pixels('z').count(), 0);
    }
}
