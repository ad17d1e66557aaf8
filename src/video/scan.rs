//! Scan-line state machine, advanced once per line interrupt.
use core::sync::atomic::Ordering;

use crate::framebuffer::FrameBuffer;
use crate::hal::Hardware;
use crate::tone::ToneState;
use crate::video::geometry::DisplayGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Serrated vertical sync lines at the top of the frame.
    VSync,
    /// Lines with horizontal sync and black picture.
    Blank,
    /// Lines streaming a frame-buffer row.
    Active,
}

/// Where the beam is. Written by the line interrupt only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    /// Line the next interrupt handles.
    pub current_line: u16,
    pub phase: Phase,
    pub frame_parity: bool,
    /// Completed frames since `begin`.
    pub frames: u32,
    /// Frame-buffer row for the next active line.
    pub render_row: u16,
    /// Lines left before `render_row` advances.
    pub vscale_count: u16,
    /// Active lines whose pixels started late.
    pub hook_overruns: u32,
}

impl ScanState {
    pub const fn new() -> Self {
        Self {
            current_line: 0,
            phase: Phase::VSync,
            frame_parity: false,
            frames: 0,
            render_row: 0,
            vscale_count: 0,
            hook_overruns: 0,
        }
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}

/// State owned by the line interrupt while video runs.
pub(crate) struct LineEngine {
    pub(crate) geometry: DisplayGeometry,
    pub(crate) scan: ScanState,
    pub(crate) screen: FrameBuffer,
    pub(crate) tone: Option<ToneState>,
}

impl LineEngine {
    pub(crate) fn new(geometry: DisplayGeometry, screen: FrameBuffer) -> Self {
        Self {
            geometry,
            scan: ScanState::new(),
            screen,
            tone: None,
        }
    }

    /// Handle one scan line. `hw.line_start()` has already been called for
    /// it. Returns true when the vertical hook is due.
    pub(crate) fn advance<H: Hardware>(&mut self, hw: &mut H) -> bool {
        let g = self.geometry;
        let line = self.scan.current_line;
        let mut vertical = false;

        if line == 0 {
            self.scan.phase = Phase::VSync;
            hw.set_sync_width(g.vsync_cycles);
            if let Some(tone) = self.tone.as_mut() {
                if !tone.on_frame(hw) {
                    self.tone = None;
                }
            }
            vertical = true;
        }

        match self.scan.phase {
            Phase::VSync => {
                if line == g.vsync_end {
                    hw.set_sync_width(g.hsync_cycles);
                    self.scan.phase = Phase::Blank;
                }
            }
            Phase::Blank => {
                if line == g.active_line_start {
                    self.scan.phase = Phase::Active;
                    self.scan.render_row = 0;
                    self.scan.vscale_count = g.vscale;
                    self.render_line(hw);
                }
            }
            Phase::Active => self.render_line(hw),
        }

        if let Some(tone) = self.tone.as_mut() {
            tone.on_line(hw);
        }

        self.scan.current_line += 1;
        if self.scan.current_line >= g.scan_lines_per_frame {
            self.scan.current_line = 0;
            self.scan.frames = self.scan.frames.wrapping_add(1);
            self.scan.frame_parity = !self.scan.frame_parity;
        }

        vertical
    }

    fn render_line<H: Hardware>(&mut self, hw: &mut H) {
        let g = self.geometry;
        if self.scan.render_row >= g.vertical_resolution {
            self.scan.phase = Phase::Blank;
            return;
        }

        if hw.line_cycles() > g.output_delay {
            self.scan.hook_overruns = self.scan.hook_overruns.saturating_add(1);
            if cfg!(debug_assertions) && self.scan.hook_overruns == 1 {
                log::warn!(
                    "line {}: pixels late ({} cycles used, {} allowed)",
                    self.scan.current_line,
                    hw.line_cycles(),
                    g.output_delay
                );
            }
        }

        hw.wait_until(g.output_delay);
        for byte in self.screen.row(self.scan.render_row) {
            hw.emit_pixels(byte.load(Ordering::Relaxed));
        }
        hw.blank();

        if self.scan.vscale_count == 0 {
            self.scan.vscale_count = g.vscale;
            self.scan.render_row += 1;
        } else {
            self.scan.vscale_count -= 1;
        }

        if self.scan.current_line + 1 >= g.active_line_end() {
            self.scan.phase = Phase::Blank;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::Color;
    use crate::hal::sim::SimHardware;
    use crate::video::geometry::VideoStandard;
    use alloc::vec::Vec;

    fn engine(standard: VideoStandard) -> (LineEngine, SimHardware) {
        let g = DisplayGeometry::derive(standard, 128, 96, SimHardware::DEFAULT_CLOCK_HZ, 3).unwrap();
        let fb = FrameBuffer::allocate(128, 96).unwrap();
        let mut hw = SimHardware::new();
        hw.start_line_timer(g.samples_per_line, g.hsync_cycles);
        (LineEngine::new(g, fb), hw)
    }

    fn step(e: &mut LineEngine, hw: &mut SimHardware) -> bool {
        hw.line_start();
        e.advance(hw)
    }

    #[test]
    fn phases_follow_the_frame() {
        let (mut e, mut hw) = engine(VideoStandard::Ntsc);
        let mut phases = Vec::new();
        let mut vertical = 0;
        for _ in 0..262 {
            if step(&mut e, &mut hw) {
                vertical += 1;
            }
            phases.push(e.scan.phase);
        }
        assert_eq!(vertical, 1);
        assert_eq!(phases[0], Phase::VSync);
        assert_eq!(phases[2], Phase::VSync);
        assert_eq!(phases[3], Phase::Blank);
        assert_eq!(phases[34], Phase::Blank);
        // 35..=226 carry the picture.
        assert_eq!(phases[35], Phase::Active);
        assert_eq!(phases[225], Phase::Active);
        assert_eq!(phases[226], Phase::Blank);
        assert_eq!(phases[261], Phase::Blank);
        assert_eq!(e.scan.current_line, 0);
        assert_eq!(e.scan.frames, 1);
        assert!(e.scan.frame_parity);
    }

    #[test]
    fn each_row_is_streamed_vscale_plus_one_times() {
        let (mut e, mut hw) = engine(VideoStandard::Pal);
        e.screen.set_pixel(0, 0, Color::White);
        e.screen.set_pixel(127, 95, Color::White);
        for _ in 0..312 {
            step(&mut e, &mut hw);
        }
        let rows = hw.take_scanout();
        assert_eq!(rows.len(), 192);
        assert_eq!(rows[0][0], 0x80);
        assert_eq!(rows[1][0], 0x80);
        assert_eq!(rows[2][0], 0x00);
        assert_eq!(rows[191][15], 0x01);
        assert!(rows.iter().all(|r| r.len() == 16));
    }

    #[test]
    fn sync_width_switches_at_frame_start_and_vsync_end() {
        let (mut e, mut hw) = engine(VideoStandard::Ntsc);
        for _ in 0..262 * 2 {
            step(&mut e, &mut hw);
        }
        let g = e.geometry;
        assert_eq!(
            hw.take_sync_changes(),
            [
                (0, g.vsync_cycles),
                (3, g.hsync_cycles),
                (262, g.vsync_cycles),
                (265, g.hsync_cycles)
            ]
        );
    }

    #[test]
    fn late_start_is_counted() {
        let (mut e, mut hw) = engine(VideoStandard::Ntsc);
        for _ in 0..35 {
            step(&mut e, &mut hw);
        }
        assert_eq!(e.scan.hook_overruns, 0);

        hw.line_start();
        hw.burn(e.geometry.output_delay + 1);
        e.advance(&mut hw);
        assert_eq!(e.scan.hook_overruns, 1);
        assert_eq!(hw.take_scanout().len(), 1);
        assert_eq!(hw.take_row_starts(), [(35, e.geometry.output_delay + 1)]);
    }
}
