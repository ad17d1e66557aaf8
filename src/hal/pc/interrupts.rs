//! IDT for the PC backend.
//!
//! | Vector | Handler                                  |
//! |--------|------------------------------------------|
//! | #BP    | log, continue                            |
//! | #DF    | panic                                    |
//! | 32     | line interrupt: `CORE.on_line_interrupt` |
//!
//! Kernels with their own IDT call `register` on it instead of `init_idt`.
use spin::Lazy;
use x86_64::structures::idt::{InterruptDescriptorTable, InterruptStackFrame};

use super::pic::{self, InterruptIndex};
use super::CORE;

static IDT: Lazy<InterruptDescriptorTable> = Lazy::new(|| {
    let mut idt = InterruptDescriptorTable::new();
    idt.breakpoint.set_handler_fn(breakpoint_handler);
    idt.double_fault.set_handler_fn(double_fault_handler);
    register(&mut idt);
    idt
});

pub fn init_idt() {
    IDT.load();
}

/// Install the line interrupt handler into `idt`.
pub fn register(idt: &mut InterruptDescriptorTable) {
    idt[InterruptIndex::Line.as_u8()].set_handler_fn(line_interrupt_handler);
}

extern "x86-interrupt" fn breakpoint_handler(stack_frame: InterruptStackFrame) {
    log::warn!("EXCEPTION: BREAKPOINT\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn double_fault_handler(stack_frame: InterruptStackFrame, error_code: u64) -> ! {
    panic!("EXCEPTION: DOUBLE FAULT\n{stack_frame:#?}\n CODE{error_code}");
}

extern "x86-interrupt" fn line_interrupt_handler(_stack_frame: InterruptStackFrame) {
    CORE.on_line_interrupt();
    pic::end_of_line_interrupt();
}
