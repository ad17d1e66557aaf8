//! Cursor-based character output into a frame buffer.
use embedded_graphics::{
    mono_font::MonoTextStyleBuilder,
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};

use crate::framebuffer::{Color, Direction, FrameBuffer};
use crate::text::font::{Font, FontTable, DEFAULT_FONT};

/// Cursor position in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub x: u16,
    pub y: u16,
}

/// Text state layered over a frame buffer. Holds no pixels itself.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    cursor: Cursor,
    font: Font,
}

impl TextRenderer {
    pub const fn new() -> Self {
        Self {
            cursor: Cursor { x: 0, y: 0 },
            font: DEFAULT_FONT,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn font(&self) -> Font {
        self.font
    }

    pub fn select_font(&mut self, font: Font) {
        self.font = font;
    }

    pub fn home(&mut self) {
        self.cursor = Cursor::default();
    }

    /// Columns on `screen` with the current font.
    pub fn columns(&self, screen: &FrameBuffer) -> u16 {
        match self.font.cell_width() {
            0 => 0,
            w => screen.width() / w,
        }
    }

    pub fn rows(&self, screen: &FrameBuffer) -> u16 {
        match self.font.cell_height() {
            0 => 0,
            h => screen.height() / h,
        }
    }

    /// Move to cell (`x`, `y`), clamped to the screen.
    pub fn set_cursor(&mut self, screen: &FrameBuffer, x: u16, y: u16) {
        self.cursor = Cursor {
            x: x.min(self.columns(screen).saturating_sub(1)),
            y: y.min(self.rows(screen).saturating_sub(1)),
        };
    }

    /// Handle one byte. Returns the number of bytes consumed (always 1).
    pub fn write_byte(&mut self, screen: &FrameBuffer, byte: u8) -> usize {
        let columns = self.columns(screen);
        let rows = self.rows(screen);
        if columns == 0 || rows == 0 {
            return 1;
        }
        // A font change can leave the cursor outside the new grid.
        self.cursor.x = self.cursor.x.min(columns);
        self.cursor.y = self.cursor.y.min(rows - 1);

        match byte {
            b'\n' => {
                self.cursor.x = 0;
                self.next_row(screen, rows);
            }
            b'\r' => self.cursor.x = 0,
            0x08 => {
                if self.cursor.x > 0 {
                    self.cursor.x -= 1;
                } else if self.cursor.y > 0 {
                    self.cursor.y -= 1;
                    self.cursor.x = columns - 1;
                }
            }
            0x0c => {
                screen.fill(Color::Black);
                self.home();
            }
            0x00..=0x1f => {}
            _ => {
                if self.cursor.x >= columns {
                    self.cursor.x = 0;
                    self.next_row(screen, rows);
                }
                self.draw_glyph(screen, self.cursor.x, self.cursor.y, byte);
                self.cursor.x += 1;
            }
        }
        1
    }

    /// Write bytes up to the first NUL.
    pub fn print_pgm(&mut self, screen: &FrameBuffer, text: &'static [u8]) -> usize {
        text.iter()
            .take_while(|&&b| b != 0)
            .map(|&b| self.write_byte(screen, b))
            .sum()
    }

    fn next_row(&mut self, screen: &FrameBuffer, rows: u16) {
        if self.cursor.y + 1 < rows {
            self.cursor.y += 1;
        } else {
            screen.shift(self.font.cell_height(), Direction::Up);
            self.cursor.y = rows - 1;
        }
    }

    /// Draw `c` as an opaque cell at text cell (`col`, `row`).
    pub fn draw_glyph(&self, screen: &FrameBuffer, col: u16, row: u16, c: u8) {
        let w = self.font.cell_width();
        let h = self.font.cell_height();
        let x = (col * w) as i32;
        let y = (row * h) as i32;
        screen.draw_rect(x, y, w, h, Color::Black, Some(Color::Black));

        match self.font {
            Font::Table(table) => draw_table_glyph(screen, &table, x, y, c),
            Font::Mono(font) => {
                let style = MonoTextStyleBuilder::new()
                    .font(font)
                    .text_color(BinaryColor::On)
                    .background_color(BinaryColor::Off)
                    .build();
                let mut buf = [0u8; 4];
                let s = char::from(c).encode_utf8(&mut buf);
                let mut target = screen.clone();
                Text::with_baseline(s, Point::new(x, y), style, Baseline::Top)
                    .draw(&mut target)
                    .ok();
            }
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_table_glyph(screen: &FrameBuffer, table: &FontTable, x: i32, y: i32, c: u8) {
    let Some(glyph) = table.glyph(c) else {
        return;
    };
    let width = table.glyph_width() as usize;
    let stride = width.div_ceil(8);
    for (r, row) in glyph.chunks(stride).enumerate() {
        for col in 0..width {
            if row[col / 8] & (0x80 >> (col % 8)) != 0 {
                screen.set_pixel(x + col as i32, y + r as i32, Color::White);
            }
        }
    }
}
