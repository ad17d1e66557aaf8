//! # Video Engine
//!
//! One timer interrupt per scan line drives the whole picture.
//!
//! ## Frame Layout (NTSC, 128x96)
//!
//! ```text
//!   line 0 ─┬─ VSync   (wide sync pulses, vertical hook, tone frame count)
//!           │
//!   line 3 ─┼─ Blank   (normal hsync, black)
//!           │
//!   line 35 ┼─ Active  (row = (line - 35) / (vscale + 1))
//!           │
//!   line 227┼─ Blank
//!   line 261┘
//! ```
//!
//! ## Per-Line Sequence
//!
//! ```text
//!   line_start ─▶ horizontal hook ─▶ advance (sync width, pixels) ─▶ vertical hook
//! ```
//!
//! `geometry` derives the constants, `scan` holds the state machine and
//! `engine` owns the shared state behind the interrupt.

pub mod engine;
pub mod geometry;
pub mod scan;

pub use engine::VideoCore;
pub use geometry::{us_to_cycles, DisplayGeometry, StandardTiming, VideoStandard};
pub use scan::{Phase, ScanState};
