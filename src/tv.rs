//! # TvOut
//!
//! Main-thread facade over a `VideoCore`: starts and stops video, draws into
//! the frame buffer, prints text, plays tones and registers hooks.
//!
//! Everything here is safe to call while the line interrupt runs. Drawing
//! calls made while video is stopped do nothing.

use core::fmt;
use core::sync::atomic::AtomicU8;

use alloc::boxed::Box;

use crate::error::{BeginError, ToneError};
use crate::framebuffer::{Color, Direction, FrameBuffer};
use crate::hal::Hardware;
use crate::text::{Cursor, Font, Print, TextRenderer};
use crate::tone::{self, Remaining};
use crate::video::{DisplayGeometry, ScanState, VideoCore, VideoStandard};

pub const DEFAULT_WIDTH: u16 = 128;
pub const DEFAULT_HEIGHT: u16 = 96;

pub struct TvOut<'a, H: Hardware> {
    core: &'a VideoCore<H>,
    screen: Option<FrameBuffer>,
    text: TextRenderer,
}

impl<'a, H: Hardware> TvOut<'a, H> {
    pub const fn new(core: &'a VideoCore<H>) -> Self {
        Self {
            core,
            screen: None,
            text: TextRenderer::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Start video at 128x96.
    pub fn begin(&mut self, standard: VideoStandard) -> Result<(), BeginError> {
        self.begin_with(standard, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Start video at `x` by `y` pixels with an engine-allocated buffer.
    pub fn begin_with(&mut self, standard: VideoStandard, x: u16, y: u16) -> Result<(), BeginError> {
        let result = self.derive(standard, x, y).and_then(|geometry| {
            let budget = self.core.with_hardware(|hw| hw.memory_budget());
            if geometry.buffer_len() > budget {
                return Err(BeginError::OutOfMemory);
            }
            let screen = FrameBuffer::allocate(x, y).ok_or(BeginError::OutOfMemory)?;
            Ok((geometry, screen))
        });
        self.install(result)
    }

    /// Start video on a caller-owned buffer of at least `ceil(x/8) * y` bytes.
    pub fn begin_with_buffer(
        &mut self,
        standard: VideoStandard,
        x: u16,
        y: u16,
        buffer: &'static [AtomicU8],
    ) -> Result<(), BeginError> {
        let result = self.derive(standard, x, y).and_then(|geometry| {
            let screen = FrameBuffer::from_static(x, y, buffer).ok_or(BeginError::BufferTooSmall)?;
            Ok((geometry, screen))
        });
        self.install(result)
    }

    fn derive(&self, standard: VideoStandard, x: u16, y: u16) -> Result<DisplayGeometry, BeginError> {
        let (clock_hz, pixel_cycles) = self
            .core
            .with_hardware(|hw| (hw.clock_hz(), hw.pixel_cycles()));
        DisplayGeometry::derive(standard, x, y, clock_hz, pixel_cycles)
    }

    fn install(&mut self, prepared: Result<(DisplayGeometry, FrameBuffer), BeginError>) -> Result<(), BeginError> {
        let (geometry, screen) = prepared.inspect_err(|e| log::warn!("begin refused: {} (code {})", e, e.code()))?;
        screen.fill(Color::Black);
        self.core.start(geometry, screen.clone());
        self.screen = Some(screen);
        self.text.home();
        Ok(())
    }

    /// Stop video, silence the tone, drop hooks and release the buffer.
    pub fn end(&mut self) {
        self.core.stop();
        self.screen = None;
        self.text.home();
    }

    pub fn is_running(&self) -> bool {
        self.screen.is_some() && self.core.is_running()
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn hres(&self) -> u16 {
        self.screen.as_ref().map_or(0, FrameBuffer::width)
    }

    pub fn vres(&self) -> u16 {
        self.screen.as_ref().map_or(0, FrameBuffer::height)
    }

    /// Characters per text row with the selected font.
    pub fn char_line(&self) -> u16 {
        let cell_width = self.text.font().cell_width();
        self.geometry().map_or(0, |g| g.characters_per_line(cell_width))
    }

    pub fn millis(&self) -> u32 {
        self.core.millis()
    }

    pub fn frames(&self) -> u32 {
        self.core.frames()
    }

    pub fn scan_state(&self) -> Option<ScanState> {
        self.core.scan_state()
    }

    pub fn geometry(&self) -> Option<DisplayGeometry> {
        self.core.geometry()
    }

    pub fn screen(&self) -> Option<&FrameBuffer> {
        self.screen.as_ref()
    }

    pub fn core(&self) -> &'a VideoCore<H> {
        self.core
    }

    // ---------------------------------------------------------------------
    // Delays
    // ---------------------------------------------------------------------

    /// Busy-wait `ms` milliseconds of video time. Returns at once if video
    /// is stopped.
    pub fn delay(&self, ms: u32) {
        let start = self.core.millis();
        while self.core.is_running() && self.core.millis().wrapping_sub(start) < ms {
            core::hint::spin_loop();
        }
    }

    /// Busy-wait until `frames` more frames have started. Returns at the start
    /// of vertical sync, the longest stretch without visible lines.
    pub fn delay_frame(&self, frames: u32) {
        let start = self.core.frames();
        while self.core.is_running() && self.core.frames().wrapping_sub(start) < frames {
            core::hint::spin_loop();
        }
    }

    // ---------------------------------------------------------------------
    // Overrides
    // ---------------------------------------------------------------------

    pub fn force_vscale(&self, factor: u16) {
        self.core.force_vscale(factor);
    }

    pub fn force_outstart(&self, us: f32) {
        self.core.force_outstart(us);
    }

    pub fn force_linestart(&self, line: u16) {
        self.core.force_linestart(line);
    }

    // ---------------------------------------------------------------------
    // Drawing
    // ---------------------------------------------------------------------

    fn draw(&self, f: impl FnOnce(&FrameBuffer)) {
        if let Some(screen) = self.screen.as_ref() {
            f(screen);
        }
    }

    pub fn set_pixel(&self, x: i32, y: i32, color: Color) {
        self.draw(|s| s.set_pixel(x, y, color));
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        self.screen.as_ref().map_or(Color::Black, |s| s.get_pixel(x, y))
    }

    /// Fill the screen. Black or White also homes the text cursor.
    pub fn fill(&mut self, color: Color) {
        self.draw(|s| s.fill(color));
        if color != Color::Invert {
            self.text.home();
        }
    }

    pub fn clear_screen(&mut self) {
        self.fill(Color::Black);
    }

    pub fn invert(&mut self) {
        self.fill(Color::Invert);
    }

    pub fn shift(&self, distance: u16, direction: Direction) {
        self.draw(|s| s.shift(distance, direction));
    }

    pub fn draw_line(&self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.draw(|s| s.draw_line(x0, y0, x1, y1, color));
    }

    pub fn draw_row(&self, line: i32, x0: i32, x1: i32, color: Color) {
        self.draw(|s| s.draw_row(line, x0, x1, color));
    }

    pub fn draw_column(&self, column: i32, y0: i32, y1: i32, color: Color) {
        self.draw(|s| s.draw_column(column, y0, y1, color));
    }

    pub fn draw_rect(&self, x: i32, y: i32, w: u16, h: u16, color: Color, fill: Option<Color>) {
        self.draw(|s| s.draw_rect(x, y, w, h, color, fill));
    }

    pub fn draw_circle(&self, x: i32, y: i32, radius: u16, color: Color, fill: Option<Color>) {
        self.draw(|s| s.draw_circle(x, y, radius, color, fill));
    }

    pub fn bitmap(&self, x: i32, y: i32, src: &[u8], offset: usize, width: u8, lines: u8) {
        self.draw(|s| s.bitmap(x, y, src, offset, width, lines));
    }

    // ---------------------------------------------------------------------
    // Hooks
    // ---------------------------------------------------------------------

    /// Run `hook` once per frame from the line interrupt.
    pub fn set_vbi_hook(&self, hook: impl FnMut() + Send + 'static) {
        self.core.hooks().set_vertical(Some(Box::new(hook)));
    }

    /// Run `hook` at the start of every scan line from the line interrupt.
    pub fn set_hbi_hook(&self, hook: impl FnMut() + Send + 'static) {
        self.core.hooks().set_horizontal(Some(Box::new(hook)));
    }

    pub fn clear_vbi_hook(&self) {
        self.core.hooks().set_vertical(None);
    }

    pub fn clear_hbi_hook(&self) {
        self.core.hooks().set_horizontal(None);
    }

    // ---------------------------------------------------------------------
    // Tone
    // ---------------------------------------------------------------------

    /// Play `frequency` Hz for `duration_ms` (0 plays until `no_tone`).
    pub fn tone(&self, frequency: u32, duration_ms: u32) -> Result<(), ToneError> {
        let geometry = self.core.geometry().ok_or(ToneError::VideoStopped)?;
        let remaining = match duration_ms {
            0 => Remaining::Unbounded,
            ms => Remaining::Frames(tone::frames_for(ms, geometry.frame_rate())),
        };
        self.core.start_tone(frequency, remaining)
    }

    pub fn tone_forever(&self, frequency: u32) -> Result<(), ToneError> {
        self.tone(frequency, 0)
    }

    pub fn no_tone(&self) {
        self.core.stop_tone();
    }

    // ---------------------------------------------------------------------
    // Text
    // ---------------------------------------------------------------------

    pub fn set_cursor(&mut self, x: u16, y: u16) {
        if let Some(screen) = self.screen.as_ref() {
            self.text.set_cursor(screen, x, y);
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.text.cursor()
    }

    pub fn select_font(&mut self, font: Font) {
        self.text.select_font(font);
    }

    /// Print a NUL-terminated string from read-only memory.
    pub fn print_pgm(&mut self, text: &'static [u8]) -> usize {
        match self.screen.as_ref() {
            Some(screen) => self.text.print_pgm(screen, text),
            None => 0,
        }
    }
}

impl<H: Hardware> Print for TvOut<'_, H> {
    fn write_byte(&mut self, byte: u8) -> usize {
        match self.screen.as_ref() {
            Some(screen) => self.text.write_byte(screen, byte),
            None => 0,
        }
    }
}

impl<H: Hardware> fmt::Write for TvOut<'_, H> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s);
        Ok(())
    }
}
