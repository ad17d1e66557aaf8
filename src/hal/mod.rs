//! # Hardware Seam
//!
//! Everything the line engine and tone generator need from the platform.
//!
//! ## Backends
//!
//! | Backend       | Where              | Line timer        | Tone timer           |
//! |---------------|--------------------|-------------------|----------------------|
//! | `SimHardware` | hosted (tests)     | recorded          | configurable         |
//! | `PcHardware`  | bare-metal x86_64  | PIT channel 0     | PIT channel 2 + 0x61 |
//!
//! ## Timing Units
//!
//! All durations handed to a backend are in its own timer cycles
//! (`clock_hz` ticks), measured from the start of the current line.

pub mod sim;

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub mod pc;

/// What the platform offers for tone output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneTimer {
    /// A timer of its own that toggles the tone pin on compare match.
    /// `prescalers` ascend; compare values run `0..=max_compare`.
    Dedicated {
        prescalers: &'static [u16],
        max_compare: u16,
    },
    /// No spare timer: the line interrupt toggles the tone pin itself.
    SharedWithLine,
}

/// Timer, pin and memory plumbing for one video output.
///
/// The line timer fires the platform's line interrupt, which must call
/// `VideoCore::on_line_interrupt`. Methods called from that interrupt
/// (`line_start`, `set_sync_width`, `wait_until`, `emit_pixels`, `blank`,
/// `line_cycles`, `toggle_tone_pin`) sit on the critical path and must not
/// block beyond what they are asked to wait for.
pub trait Hardware: Send {
    /// Timer clock in Hz.
    fn clock_hz(&self) -> u32;

    /// Heap bytes the engine may claim for its own frame buffer.
    fn memory_budget(&self) -> usize {
        usize::MAX
    }

    /// Timer cycles needed to shift out one pixel. 0 when the pixel clock is
    /// not tied to the timer clock.
    fn pixel_cycles(&self) -> u16 {
        1
    }

    /// Start firing the line interrupt every `period + 1` cycles, with a sync
    /// pulse `sync_width` cycles long at the start of each line.
    fn start_line_timer(&mut self, period: u16, sync_width: u16);

    fn stop_line_timer(&mut self);

    /// Width of the sync pulse for following lines.
    fn set_sync_width(&mut self, sync_width: u16);

    /// Called first thing in every line interrupt. Backends without a
    /// hardware sync generator produce the pulse here.
    fn line_start(&mut self) {}

    /// Cycles elapsed since the current line started.
    fn line_cycles(&mut self) -> u16;

    /// Spin until `cycles` have elapsed since the line started.
    fn wait_until(&mut self, cycles: u16);

    /// Shift eight pixels out of the video pin, MSB first.
    fn emit_pixels(&mut self, byte: u8);

    /// Return the video pin to black after a row.
    fn blank(&mut self);

    fn tone_timer(&self) -> ToneTimer;

    /// Start the dedicated tone timer toggling its pin.
    fn start_tone(&mut self, prescaler: u16, compare: u16);

    /// Stop the tone timer and leave the pin low.
    fn stop_tone(&mut self);

    /// Flip the tone pin; used when the tone shares the line timer.
    fn toggle_tone_pin(&mut self);
}

/// Run `f` with the line interrupt masked.
///
/// Main-thread code wraps every access to state the interrupt also touches,
/// so a spin lock held here can never be contended by the interrupt on the
/// same core.
#[inline]
pub fn interrupt_free<R>(f: impl FnOnce() -> R) -> R {
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    {
        x86_64::instructions::interrupts::without_interrupts(f)
    }
    #[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
    {
        f()
    }
}
