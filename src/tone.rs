//! # Tone Generator
//!
//! Square waves on a separate pin, sharing hardware timers with video.
//!
//! ## Timer Arbitration
//!
//! ```text
//!   tone(f) ──▶ plan() ──┬── Dedicated timer ──▶ prescaler/compare, pin toggles in hardware
//!                        │
//!                        └── SharedWithLine ───▶ line interrupt toggles the pin
//!                                                 every line_rate/(2f) lines
//! ```
//!
//! The line timer is never reprogrammed for sound. When the only timer is the
//! line timer, a frequency that would need more than one toggle per line is
//! refused instead of disturbing sync.
//!
//! Durations are counted in video frames; the tone is silenced from the
//! vertical interval once the count runs out.

use crate::error::ToneError;
use crate::hal::{Hardware, ToneTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Frames(u32),
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TonePlan {
    Dedicated { prescaler: u16, compare: u16 },
    LineShared { half_period_lines: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drive {
    Dedicated,
    LineShared { half_period_lines: u16, countdown: u16 },
}

/// The tone currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneState {
    pub frequency: u32,
    pub remaining: Remaining,
    drive: Drive,
}

/// Work out how to produce `frequency` on the given timer.
pub(crate) fn plan(
    timer: ToneTimer,
    clock_hz: u32,
    line_rate_hz: u32,
    frequency: u32,
) -> Result<TonePlan, ToneError> {
    if frequency == 0 {
        return Err(ToneError::ZeroFrequency);
    }

    match timer {
        ToneTimer::Dedicated { prescalers, max_compare } => {
            // Toggle on compare match: two matches per period.
            let half_period = clock_hz / frequency / 2;
            for &prescaler in prescalers {
                let ticks = half_period / prescaler.max(1) as u32;
                if ticks == 0 {
                    break;
                }
                if ticks - 1 <= max_compare as u32 {
                    return Ok(TonePlan::Dedicated {
                        prescaler,
                        compare: (ticks - 1) as u16,
                    });
                }
            }
            Err(ToneError::OutOfRange)
        }
        ToneTimer::SharedWithLine => {
            let lines = line_rate_hz / frequency.saturating_mul(2);
            if lines == 0 {
                return Err(ToneError::ExceedsLineRate);
            }
            Ok(TonePlan::LineShared {
                half_period_lines: lines.min(u16::MAX as u32) as u16,
            })
        }
    }
}

/// Frames covering `duration_ms`; never zero.
pub(crate) fn frames_for(duration_ms: u32, frame_rate: u16) -> u32 {
    let frames = duration_ms as u64 * frame_rate as u64 / 1000;
    frames.clamp(1, u32::MAX as u64) as u32
}

impl ToneState {
    /// Program the hardware for `plan` and return the running state.
    pub(crate) fn start<H: Hardware>(
        plan: TonePlan,
        frequency: u32,
        remaining: Remaining,
        hw: &mut H,
    ) -> Self {
        hw.stop_tone();
        let drive = match plan {
            TonePlan::Dedicated { prescaler, compare } => {
                hw.start_tone(prescaler, compare);
                Drive::Dedicated
            }
            TonePlan::LineShared { half_period_lines } => Drive::LineShared {
                half_period_lines,
                countdown: half_period_lines,
            },
        };
        Self { frequency, remaining, drive }
    }

    /// Called at the start of each frame. Returns false once the tone ended.
    pub(crate) fn on_frame<H: Hardware>(&mut self, hw: &mut H) -> bool {
        match &mut self.remaining {
            Remaining::Unbounded => true,
            Remaining::Frames(n) => {
                *n = n.saturating_sub(1);
                if *n == 0 {
                    hw.stop_tone();
                    false
                } else {
                    true
                }
            }
        }
    }

    /// Called on every scan line.
    pub(crate) fn on_line<H: Hardware>(&mut self, hw: &mut H) {
        if let Drive::LineShared { half_period_lines, countdown } = &mut self.drive {
            *countdown -= 1;
            if *countdown == 0 {
                hw.toggle_tone_pin();
                *countdown = *half_period_lines;
            }
        }
    }
}
