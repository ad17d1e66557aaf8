//! # tvout
//!
//! Composite video (NTSC/PAL) generated from a 1-bit frame buffer by a single
//! line-rate timer interrupt.
//!
//! ## Layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | `framebuffer` | Bit-packed frame buffer and rendering primitives      |
//! | `text`        | Fonts, cursor-based text renderer, `Print` helpers    |
//! | `video`       | Display geometry, scan-line state machine, `VideoCore`|
//! | `tone`        | Square-wave tone planning and timer arbitration       |
//! | `hooks`       | Per-frame / per-line interrupt callbacks              |
//! | `hal`         | Hardware seam, hosted simulator, bare-metal PC backend|
//! | `tv`          | `TvOut`, the main-thread facade                       |
//!
//! ## Usage
//!
//! ```ignore
//! // Hosted: drive `core.on_line_interrupt()` yourself.
//! let core = VideoCore::new(SimHardware::new());
//! // Bare-metal x86_64: `hal::pc::init(LevelFilter::Info)` and use `hal::pc::CORE`.
//!
//! let mut tv = TvOut::new(&core);
//! tv.begin(VideoStandard::Ntsc)?;
//! tv.draw_circle(64, 48, 20, Color::White, None);
//! tv.print("hello");
//! ```

#![cfg_attr(not(test), no_std)]
#![cfg_attr(
    all(target_arch = "x86_64", target_os = "none"),
    feature(abi_x86_interrupt)
)]

extern crate alloc;

pub mod error;
pub mod framebuffer;
pub mod hal;
pub mod hooks;
pub mod text;
pub mod tone;
pub mod tv;
pub mod video;

pub use error::{BeginError, ToneError};
pub use framebuffer::{Color, Direction, FrameBuffer};
pub use text::{Base, Font, FontTable, Print};
pub use tv::TvOut;
pub use video::{DisplayGeometry, Phase, ScanState, VideoCore, VideoStandard};
