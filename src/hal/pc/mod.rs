//! # Bare-metal PC Backend
//!
//! | Resource        | Use                                         |
//! |-----------------|---------------------------------------------|
//! | PIT channel 0   | line timer, IRQ0 through the 8259 PIC       |
//! | PIT channel 2   | tone, gated to the speaker via port 0x61    |
//! | LPT1 data 0x378 | two-bit DAC: bit 0 sync, bit 1 video        |
//! | COM1 0x3F8      | `log` output                                |
//!
//! ## DAC Levels
//!
//! ```text
//!   sync  = 0b00   (bit0 through 1k, bit1 through 470R to the 75R load)
//!   black = 0b01
//!   white = 0b11
//! ```
//!
//! The parallel port has no sync generator, so `line_start` drives the pulse
//! in software and pixels go out as fast as port writes allow.

pub mod interrupts;
pub mod pic;
pub mod serial;

use x86_64::instructions::port::Port;

use crate::hal::{Hardware, ToneTimer};
use crate::video::VideoCore;

pub const PIT_HZ: u32 = 1_193_182;

const LEVEL_SYNC: u8 = 0b00;
const LEVEL_BLACK: u8 = 0b01;
const LEVEL_WHITE: u8 = 0b11;

/// The engine instance the IRQ0 handler drives.
pub static CORE: VideoCore<PcHardware> = VideoCore::new(PcHardware::new());

pub struct PcHardware {
    lpt_data: Port<u8>,
    pit_ch0: Port<u8>,
    pit_ch2: Port<u8>,
    pit_command: Port<u8>,
    speaker: Port<u8>,
    reload: u16,
    sync_width: u16,
}

impl PcHardware {
    pub const fn new() -> Self {
        Self {
            lpt_data: Port::new(0x378),
            pit_ch0: Port::new(0x40),
            pit_ch2: Port::new(0x42),
            pit_command: Port::new(0x43),
            speaker: Port::new(0x61),
            reload: 0,
            sync_width: 0,
        }
    }

    fn out(&mut self, level: u8) {
        unsafe { self.lpt_data.write(level) }
    }

    /// Current channel 0 count (counts down from `reload`).
    fn latch_ch0(&mut self) -> u16 {
        unsafe {
            self.pit_command.write(0x00);
            let lo = self.pit_ch0.read() as u16;
            let hi = self.pit_ch0.read() as u16;
            (hi << 8) | lo
        }
    }
}

impl Default for PcHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl Hardware for PcHardware {
    fn clock_hz(&self) -> u32 {
        PIT_HZ
    }

    fn pixel_cycles(&self) -> u16 {
        0
    }

    fn start_line_timer(&mut self, period: u16, sync_width: u16) {
        self.reload = period.saturating_add(1);
        self.sync_width = sync_width;
        unsafe {
            // Channel 0, lobyte/hibyte, mode 2 (rate generator).
            self.pit_command.write(0x34);
            self.pit_ch0.write(self.reload as u8);
            self.pit_ch0.write((self.reload >> 8) as u8);
        }
        self.out(LEVEL_BLACK);
        pic::set_line_irq(true);
    }

    fn stop_line_timer(&mut self) {
        pic::set_line_irq(false);
        self.out(LEVEL_BLACK);
    }

    fn set_sync_width(&mut self, sync_width: u16) {
        self.sync_width = sync_width;
    }

    fn line_start(&mut self) {
        self.out(LEVEL_SYNC);
        let width = self.sync_width;
        self.wait_until(width);
        self.out(LEVEL_BLACK);
    }

    fn line_cycles(&mut self) -> u16 {
        let count = self.latch_ch0();
        self.reload.wrapping_sub(count)
    }

    fn wait_until(&mut self, cycles: u16) {
        while self.line_cycles() < cycles {
            core::hint::spin_loop();
        }
    }

    fn emit_pixels(&mut self, byte: u8) {
        for bit in (0..8).rev() {
            let level = if byte & (1 << bit) != 0 { LEVEL_WHITE } else { LEVEL_BLACK };
            self.out(level);
        }
    }

    fn blank(&mut self) {
        self.out(LEVEL_BLACK);
    }

    fn tone_timer(&self) -> ToneTimer {
        // Mode 3 divides by 2 * (compare + 1); the divisor is 16 bits.
        ToneTimer::Dedicated {
            prescalers: &[1],
            max_compare: 32_766,
        }
    }

    fn start_tone(&mut self, prescaler: u16, compare: u16) {
        let divisor = 2 * (compare as u32 + 1) * prescaler.max(1) as u32;
        let divisor = divisor.min(u16::MAX as u32) as u16;
        unsafe {
            // Channel 2, lobyte/hibyte, mode 3 (square wave).
            self.pit_command.write(0xB6);
            self.pit_ch2.write(divisor as u8);
            self.pit_ch2.write((divisor >> 8) as u8);
            let gate = self.speaker.read();
            self.speaker.write(gate | 0x03);
        }
    }

    fn stop_tone(&mut self) {
        unsafe {
            let gate = self.speaker.read();
            self.speaker.write(gate & !0x03);
        }
    }

    fn toggle_tone_pin(&mut self) {
        unsafe {
            let gate = self.speaker.read() & !0x01;
            self.speaker.write(gate ^ 0x02);
        }
    }
}

/// Bring up logging, the PICs and the IDT, then enable interrupts. Video
/// starts with `TvOut::new(&CORE).begin(..)`.
pub fn init(level: log::LevelFilter) {
    serial::init_logging(level);
    pic::init();
    interrupts::init_idt();
    x86_64::instructions::interrupts::enable();
    log::info!("pc backend: PIT {} Hz, LPT1 video, COM1 log", PIT_HZ);
}
