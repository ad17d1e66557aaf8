//! Hosted stand-in for the video hardware.
//!
//! `SimHardware` keeps a cycle counter per line instead of a real timer and
//! records what a display would receive: every streamed row with the line
//! and cycle it started on, every sync width change and all tone activity.
//! Drive it by calling `VideoCore::on_line_interrupt` in a loop.
//!
//! Recordings are capped at `record_limit` entries each; once full, new
//! entries are dropped and counted in `dropped_records`. Drain them with the
//! `take_*` methods to keep recording.
use alloc::vec::Vec;

use crate::hal::{Hardware, ToneTimer};

/// Entries each recording keeps before dropping new ones.
pub const DEFAULT_RECORD_LIMIT: usize = 4096;

/// Prescalers of an 8-bit AVR-style timer.
pub const AVR_PRESCALERS: &[u16] = &[1, 8, 32, 64, 128, 256, 1024];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTimer {
    pub period: u16,
    pub sync_width: u16,
}

#[derive(Debug)]
pub struct SimHardware {
    clock_hz: u32,
    memory_budget: usize,
    pixel_cycles: u16,
    tone_timer: ToneTimer,

    line_timer: Option<LineTimer>,
    cycle: u16,
    lines_started: u64,
    row: Vec<u8>,
    row_start: Option<u16>,
    scanout: Vec<Vec<u8>>,
    /// (line index, cycle of the first pixel)
    row_starts: Vec<(u64, u16)>,
    /// (line index, new width)
    sync_changes: Vec<(u64, u16)>,
    record_limit: usize,
    dropped_records: u64,

    tone: Option<(u16, u16)>,
    tone_pin: bool,
    tone_toggles: u32,
}

impl SimHardware {
    pub const DEFAULT_CLOCK_HZ: u32 = 16_000_000;

    /// 16 MHz clock, 3 cycles per pixel, AVR-style dedicated tone timer.
    pub const fn new() -> Self {
        Self {
            clock_hz: Self::DEFAULT_CLOCK_HZ,
            memory_budget: usize::MAX,
            pixel_cycles: 3,
            tone_timer: ToneTimer::Dedicated {
                prescalers: AVR_PRESCALERS,
                max_compare: 255,
            },
            line_timer: None,
            cycle: 0,
            lines_started: 0,
            row: Vec::new(),
            row_start: None,
            scanout: Vec::new(),
            row_starts: Vec::new(),
            sync_changes: Vec::new(),
            record_limit: DEFAULT_RECORD_LIMIT,
            dropped_records: 0,
            tone: None,
            tone_pin: false,
            tone_toggles: 0,
        }
    }

    pub const fn with_clock_hz(mut self, clock_hz: u32) -> Self {
        self.clock_hz = clock_hz;
        self
    }

    pub const fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.memory_budget = bytes;
        self
    }

    pub const fn with_pixel_cycles(mut self, cycles: u16) -> Self {
        self.pixel_cycles = cycles;
        self
    }

    pub const fn with_tone_timer(mut self, timer: ToneTimer) -> Self {
        self.tone_timer = timer;
        self
    }

    pub const fn with_record_limit(mut self, entries: usize) -> Self {
        self.record_limit = entries;
        self
    }

    pub fn line_timer(&self) -> Option<LineTimer> {
        self.line_timer
    }

    pub fn lines_started(&self) -> u64 {
        self.lines_started
    }

    /// Rows streamed since the last call, oldest first.
    pub fn take_scanout(&mut self) -> Vec<Vec<u8>> {
        core::mem::take(&mut self.scanout)
    }

    /// `(line index, first pixel cycle)` of each row since the last call.
    pub fn take_row_starts(&mut self) -> Vec<(u64, u16)> {
        core::mem::take(&mut self.row_starts)
    }

    /// Entries lost because a recording was full.
    pub fn dropped_records(&self) -> u64 {
        self.dropped_records
    }

    fn current_line(&self) -> u64 {
        self.lines_started.saturating_sub(1)
    }

    fn record<T>(limit: usize, dropped: &mut u64, log: &mut Vec<T>, entry: T) {
        if log.len() < limit {
            log.push(entry);
        } else {
            *dropped += 1;
        }
    }

    /// Sync width changes since the last call as `(line index, width)`.
    pub fn take_sync_changes(&mut self) -> Vec<(u64, u16)> {
        core::mem::take(&mut self.sync_changes)
    }

    /// `(prescaler, compare)` of the running dedicated tone.
    pub fn tone(&self) -> Option<(u16, u16)> {
        self.tone
    }

    pub fn tone_pin(&self) -> bool {
        self.tone_pin
    }

    pub fn tone_toggles(&self) -> u32 {
        self.tone_toggles
    }

    /// Pretend `cycles` of work happened on the current line.
    pub fn burn(&mut self, cycles: u16) {
        self.cycle = self.cycle.saturating_add(cycles);
    }
}

impl Default for SimHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl Hardware for SimHardware {
    fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn memory_budget(&self) -> usize {
        self.memory_budget
    }

    fn pixel_cycles(&self) -> u16 {
        self.pixel_cycles
    }

    fn start_line_timer(&mut self, period: u16, sync_width: u16) {
        self.line_timer = Some(LineTimer { period, sync_width });
    }

    fn stop_line_timer(&mut self) {
        self.line_timer = None;
    }

    fn set_sync_width(&mut self, sync_width: u16) {
        if let Some(timer) = self.line_timer.as_mut() {
            timer.sync_width = sync_width;
        }
        let entry = (self.current_line(), sync_width);
        Self::record(self.record_limit, &mut self.dropped_records, &mut self.sync_changes, entry);
    }

    fn line_start(&mut self) {
        self.cycle = 0;
        self.lines_started += 1;
    }

    fn line_cycles(&mut self) -> u16 {
        self.cycle
    }

    fn wait_until(&mut self, cycles: u16) {
        self.cycle = self.cycle.max(cycles);
    }

    fn emit_pixels(&mut self, byte: u8) {
        if self.row_start.is_none() {
            self.row_start = Some(self.cycle);
        }
        self.row.push(byte);
        self.cycle = self.cycle.saturating_add(8 * self.pixel_cycles);
    }

    fn blank(&mut self) {
        let row = core::mem::take(&mut self.row);
        let line = self.current_line();
        let (limit, dropped) = (self.record_limit, &mut self.dropped_records);
        if let Some(start) = self.row_start.take() {
            Self::record(limit, dropped, &mut self.row_starts, (line, start));
        }
        Self::record(limit, dropped, &mut self.scanout, row);
    }

    fn tone_timer(&self) -> ToneTimer {
        self.tone_timer
    }

    fn start_tone(&mut self, prescaler: u16, compare: u16) {
        self.tone = Some((prescaler, compare));
    }

    fn stop_tone(&mut self) {
        self.tone = None;
        self.tone_pin = false;
    }

    fn toggle_tone_pin(&mut self) {
        self.tone_pin = !self.tone_pin;
        self.tone_toggles += 1;
    }
}
