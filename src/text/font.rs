//! Glyph sources for the text renderer.
use embedded_graphics::mono_font::{ascii::FONT_4X6, MonoFont};

/// A packed bitmap font: `[width, height, first_char, glyphs...]`.
///
/// Each glyph is `height` rows of `ceil(width / 8)` bytes, MSB is the
/// leftmost pixel. Glyphs follow each other starting at `first_char`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontTable {
    data: &'static [u8],
}

impl FontTable {
    const HEADER: usize = 3;

    /// `None` if the header is missing or describes an empty cell.
    pub const fn new(data: &'static [u8]) -> Option<Self> {
        if data.len() < Self::HEADER || data[0] == 0 || data[1] == 0 {
            return None;
        }
        Some(Self { data })
    }

    pub fn glyph_width(&self) -> u8 {
        self.data[0]
    }

    pub fn glyph_height(&self) -> u8 {
        self.data[1]
    }

    pub fn first_char(&self) -> u8 {
        self.data[2]
    }

    fn glyph_len(&self) -> usize {
        (self.glyph_width() as usize).div_ceil(8) * self.glyph_height() as usize
    }

    /// Complete glyphs present in the table.
    pub fn glyph_count(&self) -> usize {
        (self.data.len() - Self::HEADER) / self.glyph_len()
    }

    /// Packed rows for `c`, or `None` if the table does not cover it.
    pub fn glyph(&self, c: u8) -> Option<&'static [u8]> {
        let index = c.checked_sub(self.first_char())? as usize;
        if index >= self.glyph_count() {
            return None;
        }
        let start = Self::HEADER + index * self.glyph_len();
        self.data.get(start..start + self.glyph_len())
    }
}

#[derive(Clone, Copy)]
pub enum Font {
    Table(FontTable),
    Mono(&'static MonoFont<'static>),
}

/// Font selected after `begin`.
pub const DEFAULT_FONT: Font = Font::Mono(&FONT_4X6);

impl Font {
    /// Horizontal advance per character.
    pub fn cell_width(&self) -> u16 {
        match self {
            Font::Table(t) => t.glyph_width() as u16,
            Font::Mono(f) => (f.character_size.width + f.character_spacing) as u16,
        }
    }

    pub fn cell_height(&self) -> u16 {
        match self {
            Font::Table(t) => t.glyph_height() as u16,
            Font::Mono(f) => f.character_size.height as u16,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        DEFAULT_FONT
    }
}

impl core::fmt::Debug for Font {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Font::Table(t) => f
                .debug_struct("Table")
                .field("width", &t.glyph_width())
                .field("height", &t.glyph_height())
                .field("first_char", &t.first_char())
                .finish(),
            Font::Mono(m) => f
                .debug_struct("Mono")
                .field("size", &m.character_size)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3x2 glyphs for '0' and '1'.
    static DIGITS: [u8; 7] = [3, 2, b'0', 0b1110_0000, 0b1010_0000, 0b0100_0000, 0b1100_0000];

    #[test]
    fn table_lookup() {
        let font = FontTable::new(&DIGITS).unwrap();
        assert_eq!(font.glyph_count(), 2);
        assert_eq!(font.glyph(b'0'), Some(&DIGITS[3..5]));
        assert_eq!(font.glyph(b'1'), Some(&DIGITS[5..7]));
        assert_eq!(font.glyph(b'2'), None);
        assert_eq!(font.glyph(b' '), None);
    }

    #[test]
    fn rejects_empty_headers() {
        static BAD: [u8; 3] = [0, 8, 32];
        assert!(FontTable::new(&BAD).is_none());
        assert!(FontTable::new(&DIGITS[..2]).is_none());
    }

    #[test]
    fn cell_metrics() {
        assert_eq!(DEFAULT_FONT.cell_width(), 4);
        assert_eq!(DEFAULT_FONT.cell_height(), 6);
        let table = Font::Table(FontTable::new(&DIGITS).unwrap());
        assert_eq!((table.cell_width(), table.cell_height()), (3, 2));
    }
}
