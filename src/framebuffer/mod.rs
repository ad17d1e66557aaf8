//! # Frame Buffer
//!
//! Bit-packed monochrome frame buffer read by the line interrupt and written
//! by the main thread.
//!
//! ## Modules
//!
//! - `framebuffer`: `FrameBuffer` storage, pixel access, `embedded-graphics` target
//! - `primitives`: spans, lines, rectangles, circles, shifting, bitmap blits
//! - `color`: `Color` and `Direction`
//!
//! ## Memory Layout
//!
//! ```text
//!  byte:   0        1        ...  stride-1
//!  bit:  76543210 76543210       76543210
//!  x:    0......7 8.....15       ........
//! ```
//!
//! Rows follow each other with no padding other than the unused low bits of
//! the last byte when the width is not a multiple of 8. Every byte is an
//! `AtomicU8`: the scan-out loop may read a row while the main thread draws
//! into it, and the worst outcome is one line showing a half-drawn shape.

pub mod color;
#[allow(clippy::module_inception)]
pub mod framebuffer;
pub mod primitives;

pub use color::{Color, Direction};
pub use framebuffer::FrameBuffer;
