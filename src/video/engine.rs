use spin::Mutex;

use crate::error::ToneError;
use crate::framebuffer::FrameBuffer;
use crate::hal::{interrupt_free, Hardware};
use crate::hooks::HookRegistry;
use crate::tone::{self, Remaining, ToneState};
use crate::video::geometry::{us_to_cycles, DisplayGeometry};
use crate::video::scan::{LineEngine, ScanState};

/// Everything the line interrupt touches, in one place so it can live in a
/// `static` next to the interrupt handler.
///
/// Lock order is engine, then hardware. Main-thread methods take the locks
/// inside `interrupt_free`.
pub struct VideoCore<H: Hardware> {
    engine: Mutex<Option<LineEngine>>,
    hw: Mutex<H>,
    hooks: HookRegistry,
}

impl<H: Hardware> VideoCore<H> {
    pub const fn new(hw: H) -> Self {
        Self {
            engine: Mutex::new(None),
            hw: Mutex::new(hw),
            hooks: HookRegistry::new(),
        }
    }

    /// Body of the line interrupt. Does nothing while video is stopped.
    pub fn on_line_interrupt(&self) {
        if self.engine.lock().is_none() {
            return;
        }

        self.hw.lock().line_start();
        self.hooks.run_horizontal();

        let vertical = {
            let mut engine = self.engine.lock();
            let Some(engine) = engine.as_mut() else {
                return;
            };
            let mut hw = self.hw.lock();
            engine.advance(&mut *hw)
        };

        if vertical {
            self.hooks.run_vertical();
        }
    }

    /// Install `geometry` and `screen` and start the line timer. A running
    /// engine is stopped first.
    pub(crate) fn start(&self, geometry: DisplayGeometry, screen: FrameBuffer) {
        if self.is_running() {
            self.stop();
        }
        interrupt_free(|| {
            let mut engine = self.engine.lock();
            let mut hw = self.hw.lock();
            *engine = Some(LineEngine::new(geometry, screen));
            hw.start_line_timer(geometry.samples_per_line, geometry.hsync_cycles);
        });
        log::info!(
            "video: {:?} {}x{}, {} lines/frame, rows {}..{}",
            geometry.standard,
            geometry.horizontal_resolution,
            geometry.vertical_resolution,
            geometry.scan_lines_per_frame,
            geometry.active_line_start,
            geometry.active_line_end()
        );
    }

    /// Stop the line timer and tone, drop the hooks and release the frame
    /// buffer.
    pub(crate) fn stop(&self) {
        let engine = interrupt_free(|| {
            let mut engine = self.engine.lock();
            let mut hw = self.hw.lock();
            hw.stop_line_timer();
            hw.stop_tone();
            engine.take()
        });
        self.hooks.clear();
        if let Some(engine) = engine {
            log::info!("video: stopped after {} frames", engine.scan.frames);
        }
    }

    pub fn is_running(&self) -> bool {
        interrupt_free(|| self.engine.lock().is_some())
    }

    /// Direct access to the backend, e.g. to inspect a `SimHardware`.
    pub fn with_hardware<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        interrupt_free(|| f(&mut self.hw.lock()))
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    fn with_engine<R>(&self, f: impl FnOnce(&mut LineEngine) -> R) -> Option<R> {
        interrupt_free(|| self.engine.lock().as_mut().map(f))
    }

    /// Frames completed since `begin`; 0 while stopped.
    pub fn frames(&self) -> u32 {
        self.with_engine(|e| e.scan.frames).unwrap_or(0)
    }

    pub fn scan_state(&self) -> Option<ScanState> {
        self.with_engine(|e| e.scan)
    }

    pub fn geometry(&self) -> Option<DisplayGeometry> {
        self.with_engine(|e| e.geometry)
    }

    /// Milliseconds of video since `begin`, in whole frames.
    pub fn millis(&self) -> u32 {
        self.with_engine(|e| e.geometry.frames_to_millis(e.scan.frames))
            .unwrap_or(0)
    }

    pub fn start_tone(&self, frequency: u32, remaining: Remaining) -> Result<(), ToneError> {
        interrupt_free(|| {
            let mut engine = self.engine.lock();
            let engine = engine.as_mut().ok_or(ToneError::VideoStopped)?;
            let mut hw = self.hw.lock();
            let g = engine.geometry;
            let plan = tone::plan(hw.tone_timer(), hw.clock_hz(), g.line_rate_hz(), frequency)?;
            engine.tone = Some(ToneState::start(plan, frequency, remaining, &mut *hw));
            Ok(())
        })
    }

    pub fn stop_tone(&self) {
        interrupt_free(|| {
            let mut engine = self.engine.lock();
            if let Some(engine) = engine.as_mut() {
                engine.tone = None;
            }
            self.hw.lock().stop_tone();
        });
    }

    pub fn tone(&self) -> Option<ToneState> {
        self.with_engine(|e| e.tone).flatten()
    }

    /// Show each row on `factor` scan lines. Rows that no longer fit above
    /// the bottom of the picture are not shown.
    pub fn force_vscale(&self, factor: u16) {
        let factor = factor.max(1);
        self.with_engine(|e| {
            e.geometry.vscale = factor - 1;
            e.scan.vscale_count = factor - 1;
        });
    }

    /// Move the first pixel to `us` microseconds after the line start.
    pub fn force_outstart(&self, us: f32) {
        self.with_engine(|e| {
            e.geometry.output_delay = us_to_cycles(us, e.geometry.clock_hz);
        });
    }

    /// Move the first active line.
    pub fn force_linestart(&self, line: u16) {
        self.with_engine(|e| {
            let last = e.geometry.scan_lines_per_frame - 1;
            e.geometry.active_line_start = line.clamp(e.geometry.vsync_end + 1, last);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::sim::SimHardware;
    use crate::video::geometry::VideoStandard;

    fn running() -> VideoCore<SimHardware> {
        let core = VideoCore::new(SimHardware::new());
        let g = DisplayGeometry::derive(VideoStandard::Ntsc, 128, 96, 16_000_000, 3).unwrap();
        core.start(g, FrameBuffer::allocate(128, 96).unwrap());
        core
    }

    #[test]
    fn stopped_core_ignores_interrupts() {
        let core = VideoCore::new(SimHardware::new());
        for _ in 0..10 {
            core.on_line_interrupt();
        }
        assert_eq!(core.with_hardware(|hw| hw.lines_started()), 0);
        assert_eq!(core.frames(), 0);
        assert!(core.scan_state().is_none());
    }

    #[test]
    fn frames_and_millis_advance_with_lines() {
        let core = running();
        for _ in 0..262 * 60 {
            core.on_line_interrupt();
        }
        assert_eq!(core.frames(), 60);
        assert_eq!(core.millis(), 999);
    }

    #[test]
    fn stop_releases_timer_and_tone() {
        let core = running();
        core.start_tone(440, Remaining::Unbounded).unwrap();
        assert!(core.with_hardware(|hw| hw.tone().is_some()));
        core.stop();
        assert!(!core.is_running());
        assert!(core.with_hardware(|hw| hw.line_timer().is_none() && hw.tone().is_none()));
        assert_eq!(core.start_tone(440, Remaining::Unbounded), Err(ToneError::VideoStopped));
    }

    #[test]
    fn overrides_change_the_running_geometry() {
        let core = running();
        core.force_vscale(3);
        core.force_outstart(10.0);
        core.force_linestart(1);
        let g = core.geometry().unwrap();
        assert_eq!(g.vscale, 2);
        assert_eq!(g.output_delay, 159);
        assert_eq!(g.active_line_start, 4);
    }
}
