//! # 8259 PIC
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │   PIC 1     │     │   PIC 2     │
//! │  (Master)   │────▶│  (Slave)    │
//! │ IRQ 0-7     │     │ IRQ 8-15    │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! IRQs are remapped to vectors 32-47. Only IRQ0 (PIT channel 0, the line
//! timer) is ever unmasked by this crate.
use pic8259::ChainedPics;
use spin::Mutex;

pub const PIC_1_OFFSET: u8 = 32;
pub const PIC_2_OFFSET: u8 = 40;

pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum InterruptIndex {
    /// IRQ0
    Line = PIC_1_OFFSET,
}

impl InterruptIndex {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Remap both PICs with every line masked.
pub fn init() {
    let mut pics = PICS.lock();
    unsafe {
        pics.initialize();
        pics.write_masks(0xFF, 0xFF);
    }
}

pub fn set_line_irq(enabled: bool) {
    let mut pics = PICS.lock();
    unsafe {
        let [master, slave] = pics.read_masks();
        let master = if enabled { master & !0x01 } else { master | 0x01 };
        pics.write_masks(master, slave);
    }
}

/// Acknowledge IRQ0. Last thing the line interrupt handler does.
pub fn end_of_line_interrupt() {
    unsafe {
        PICS.lock()
            .notify_end_of_interrupt(InterruptIndex::Line.as_u8());
    }
}
