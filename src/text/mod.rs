//! # Text
//!
//! - `font`: packed `FontTable`s and `embedded-graphics` mono fonts
//! - `renderer`: cursor, wrapping, control bytes, scrolling
//! - `print`: the `Print` byte sink and its number/string helpers
//!
//! ## Control Bytes
//!
//! | Byte   | Effect                                  |
//! |--------|-----------------------------------------|
//! | `\0`   | ignored                                 |
//! | `\n`   | column 0 of the next row (scrolls)      |
//! | `\r`   | column 0                                |
//! | `\x08` | back one cell, wrapping to previous row |
//! | `\x0c` | clear screen, cursor home               |
//! | other < 0x20 | ignored                           |

pub mod font;
pub mod print;
pub mod renderer;

pub use font::{Font, FontTable, DEFAULT_FONT};
pub use print::{Base, Print};
pub use renderer::{Cursor, TextRenderer};
