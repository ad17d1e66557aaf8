//! Text output through `TvOut`.

use proptest::prelude::*;
use tvout::text::Cursor;
use tvout::hal::sim::SimHardware;
use tvout::{Base, Color, Font, FontTable, Print, TvOut, VideoCore, VideoStandard};

// 8x8 glyphs for ' ' (blank) and '!' (full block).
static BLOCKS: [u8; 3 + 16] = [
    8, 8, b' ',
    0, 0, 0, 0, 0, 0, 0, 0,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

fn started(core: &VideoCore<SimHardware>) -> TvOut<'_, SimHardware> {
    let mut tv = TvOut::new(core);
    tv.begin(VideoStandard::Ntsc).unwrap();
    tv
}

proptest! {
    #[test]
    fn cursor_follows_lazy_wrap(n in 0usize..=512) {
        let core = VideoCore::new(SimHardware::new());
        let mut tv = started(&core);
        let cols = tv.char_line() as usize;
        prop_assert_eq!(cols, 32);

        for _ in 0..n {
            tv.write_byte(b'x');
        }
        let expected = match n {
            0 => Cursor { x: 0, y: 0 },
            n => Cursor { x: ((n - 1) % cols + 1) as u16, y: ((n - 1) / cols) as u16 },
        };
        prop_assert_eq!(tv.cursor(), expected);
    }
}

#[test]
fn one_more_than_a_line_wraps_to_column_one() {
    let core = VideoCore::new(SimHardware::new());
    let mut tv = started(&core);
    let line = "y".repeat(tv.char_line() as usize);
    tv.print(&line);
    assert_eq!(tv.cursor(), Cursor { x: 32, y: 0 });
    tv.print("y");
    assert_eq!(tv.cursor(), Cursor { x: 1, y: 1 });
}

#[test]
fn table_fonts_draw_and_scroll() {
    let core = VideoCore::new(SimHardware::new());
    let mut tv = started(&core);
    tv.select_font(Font::Table(FontTable::new(&BLOCKS).unwrap()));
    assert_eq!(tv.char_line(), 16);

    tv.print("!");
    assert_eq!(tv.get_pixel(0, 0), Color::White);
    assert_eq!(tv.get_pixel(7, 7), Color::White);
    assert_eq!(tv.get_pixel(8, 0), Color::Black);

    // Twelve rows of 8 pixels fill the 96-pixel screen; the twelfth newline
    // scrolls the block off the top.
    for _ in 0..11 {
        tv.print("\n");
    }
    assert_eq!(tv.cursor(), Cursor { x: 0, y: 11 });
    assert_eq!(tv.get_pixel(0, 0), Color::White);
    tv.print("\n");
    assert_eq!(tv.cursor(), Cursor { x: 0, y: 11 });
    assert_eq!(tv.get_pixel(0, 0), Color::Black);
}

#[test]
fn formatted_output() {
    let core = VideoCore::new(SimHardware::new());
    let mut tv = started(&core);
    assert_eq!(tv.print_number(255, Base::Hex), 2);
    assert_eq!(tv.print_signed(-7, Base::Dec), 2);
    assert_eq!(tv.print_float(2.5, 1), 3);
    assert_eq!(tv.println(""), 2);
    assert_eq!(tv.cursor(), Cursor { x: 0, y: 1 });

    use std::fmt::Write;
    write!(tv, "{}:{}", 12, "ab").unwrap();
    assert_eq!(tv.cursor(), Cursor { x: 5, y: 1 });
}

#[test]
fn set_cursor_and_form_feed() {
    let core = VideoCore::new(SimHardware::new());
    let mut tv = started(&core);
    tv.set_cursor(10, 5);
    assert_eq!(tv.cursor(), Cursor { x: 10, y: 5 });
    tv.set_cursor(500, 500);
    assert_eq!(tv.cursor(), Cursor { x: 31, y: 15 });

    tv.draw_rect(0, 0, 10, 10, Color::White, Some(Color::White));
    tv.print("\x0c");
    assert_eq!(tv.cursor(), Cursor::default());
    assert_eq!(tv.get_pixel(5, 5), Color::Black);
}

#[test]
fn pgm_strings() {
    static MESSAGE: &[u8] = b"hello\0ignored";
    let core = VideoCore::new(SimHardware::new());
    let mut tv = started(&core);
    assert_eq!(tv.print_pgm(MESSAGE), 5);
    assert_eq!(tv.cursor(), Cursor { x: 5, y: 0 });
}
