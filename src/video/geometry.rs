//! Video standards and the display geometry derived from them.
use crate::error::BeginError;

/// Horizontal sync pulse.
pub const TIME_HSYNC_US: f32 = 4.7;
/// Serrated vertical sync pulse.
pub const TIME_VSYNC_US: f32 = 58.85;
/// Usable part of a line for pixels.
pub const TIME_ACTIVE_US: f32 = 46.0;

/// Line and frame constants for one broadcast standard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardTiming {
    pub line_us: f32,
    pub line_ns: u32,
    /// Offset of the first pixel from the start of the line.
    pub output_start_us: f32,
    pub lines_per_frame: u16,
    /// First line after the vertical sync lines.
    pub vsync_end: u16,
    /// Lines that can carry picture.
    pub display_lines: u16,
    pub frame_rate: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VideoStandard {
    Ntsc = 0,
    Pal = 1,
}

impl VideoStandard {
    pub const fn timing(self) -> StandardTiming {
        match self {
            VideoStandard::Ntsc => StandardTiming {
                line_us: 63.55,
                line_ns: 63_550,
                output_start_us: 12.0,
                lines_per_frame: 262,
                vsync_end: 3,
                display_lines: 216,
                frame_rate: 60,
            },
            VideoStandard::Pal => StandardTiming {
                line_us: 64.0,
                line_ns: 64_000,
                output_start_us: 12.5,
                lines_per_frame: 312,
                vsync_end: 7,
                display_lines: 260,
                frame_rate: 50,
            },
        }
    }
}

impl TryFrom<u8> for VideoStandard {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VideoStandard::Ntsc),
            1 => Ok(VideoStandard::Pal),
            other => Err(other),
        }
    }
}

fn cycles(us: f32, clock_hz: u32) -> u32 {
    let cycles = libm::floorf(us * (clock_hz as f32 / 1_000_000.0));
    if cycles <= 1.0 {
        return 0;
    }
    cycles as u32 - 1
}

/// Timer cycles in `us` microseconds, minus one (timer compare semantics).
/// Saturates at the 16-bit timer limit.
pub fn us_to_cycles(us: f32, clock_hz: u32) -> u16 {
    cycles(us, clock_hz).min(u16::MAX as u32) as u16
}

/// Resolution plus the timing constants the line engine runs on.
///
/// Fixed once video starts, except through the `force_*` overrides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub standard: VideoStandard,
    /// Pixels per row.
    pub horizontal_resolution: u16,
    /// Rows.
    pub vertical_resolution: u16,
    pub scan_lines_per_frame: u16,
    pub vsync_end: u16,
    pub active_line_start: u16,
    /// Each row is repeated on `vscale + 1` scan lines.
    pub vscale: u16,
    /// Line period in timer cycles.
    pub samples_per_line: u16,
    pub hsync_cycles: u16,
    pub vsync_cycles: u16,
    /// Cycle at which the first pixel leaves the pin.
    pub output_delay: u16,
    pub clock_hz: u32,
}

impl DisplayGeometry {
    /// Derive and validate a geometry for `width` x `height` pixels.
    pub fn derive(
        standard: VideoStandard,
        width: u16,
        height: u16,
        clock_hz: u32,
        pixel_cycles: u16,
    ) -> Result<Self, BeginError> {
        if width == 0 || height == 0 || width % 8 != 0 {
            return Err(BeginError::InvalidResolution);
        }

        let timing = standard.timing();
        if height > timing.display_lines {
            return Err(BeginError::TooManyLines);
        }

        if cycles(timing.line_us, clock_hz) > u16::MAX as u32 {
            return Err(BeginError::ClockTooFast);
        }

        // Backends reporting 0 cycles per pixel shift out faster than the
        // timer ticks and are not limited here.
        let window = us_to_cycles(TIME_ACTIVE_US, clock_hz) as u32 + 1;
        if width as u32 * pixel_cycles as u32 > window {
            return Err(BeginError::TooWide);
        }

        let vscale = timing.display_lines / height - 1;
        let mid = (timing.lines_per_frame - timing.display_lines) / 2 + timing.display_lines / 2;
        let span = height as u32 * (vscale as u32 + 1);

        Ok(Self {
            standard,
            horizontal_resolution: width,
            vertical_resolution: height,
            scan_lines_per_frame: timing.lines_per_frame,
            vsync_end: timing.vsync_end,
            active_line_start: mid - (span / 2) as u16,
            vscale,
            samples_per_line: us_to_cycles(timing.line_us, clock_hz),
            hsync_cycles: us_to_cycles(TIME_HSYNC_US, clock_hz),
            vsync_cycles: us_to_cycles(TIME_VSYNC_US, clock_hz),
            output_delay: us_to_cycles(timing.output_start_us, clock_hz),
            clock_hz,
        })
    }

    /// First scan line after the picture.
    pub fn active_line_end(&self) -> u16 {
        let span = self.vertical_resolution as u32 * (self.vscale as u32 + 1);
        (self.active_line_start as u32 + span).min(u16::MAX as u32) as u16
    }

    pub fn bytes_per_row(&self) -> usize {
        (self.horizontal_resolution as usize).div_ceil(8)
    }

    pub fn buffer_len(&self) -> usize {
        self.bytes_per_row() * self.vertical_resolution as usize
    }

    /// Text columns for glyph cells `cell_width` pixels wide.
    pub fn characters_per_line(&self, cell_width: u16) -> u16 {
        match cell_width {
            0 => 0,
            w => self.horizontal_resolution / w,
        }
    }

    pub fn frame_rate(&self) -> u16 {
        self.standard.timing().frame_rate
    }

    /// Line interrupts per second.
    pub fn line_rate_hz(&self) -> u32 {
        self.clock_hz / (self.samples_per_line as u32 + 1)
    }

    /// Milliseconds covered by `frames` whole frames.
    pub fn frames_to_millis(&self, frames: u32) -> u32 {
        let timing = self.standard.timing();
        let ns = frames as u64 * timing.lines_per_frame as u64 * timing.line_ns as u64;
        (ns / 1_000_000) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOCK: u32 = 16_000_000;

    #[test]
    fn ntsc_128x96_matches_classic_constants() {
        let g = DisplayGeometry::derive(VideoStandard::Ntsc, 128, 96, CLOCK, 3).unwrap();
        assert_eq!(g.scan_lines_per_frame, 262);
        assert_eq!(g.vscale, 1);
        assert_eq!(g.active_line_start, 35);
        assert_eq!(g.active_line_end(), 227);
        assert_eq!(g.samples_per_line, 1015);
        assert_eq!(g.hsync_cycles, 74);
        assert_eq!(g.vsync_cycles, 940);
        assert_eq!(g.output_delay, 191);
        assert_eq!(g.buffer_len(), 16 * 96);
        assert_eq!(g.characters_per_line(4), 32);
        assert_eq!(g.characters_per_line(0), 0);
    }

    #[test]
    fn pal_geometry() {
        let g = DisplayGeometry::derive(VideoStandard::Pal, 128, 96, CLOCK, 3).unwrap();
        assert_eq!(g.scan_lines_per_frame, 312);
        assert_eq!(g.vsync_end, 7);
        assert_eq!(g.active_line_start, 60);
        assert_eq!(g.samples_per_line, 1023);
        assert_eq!(g.output_delay, 199);
        assert_eq!(g.frame_rate(), 50);
    }

    #[test]
    fn full_height_uses_every_display_line() {
        let g = DisplayGeometry::derive(VideoStandard::Ntsc, 64, 216, CLOCK, 3).unwrap();
        assert_eq!(g.vscale, 0);
        assert_eq!(g.active_line_end() - g.active_line_start, 216);
        assert!(g.active_line_start > g.vsync_end);
    }

    #[test]
    fn rejects_bad_resolutions() {
        let derive = |w, h| DisplayGeometry::derive(VideoStandard::Ntsc, w, h, CLOCK, 3);
        assert_eq!(derive(0, 96), Err(BeginError::InvalidResolution));
        assert_eq!(derive(128, 0), Err(BeginError::InvalidResolution));
        assert_eq!(derive(130, 96), Err(BeginError::InvalidResolution));
        assert_eq!(derive(128, 217), Err(BeginError::TooManyLines));
        assert_eq!(derive(248, 96), Err(BeginError::TooWide));
        assert!(derive(240, 96).is_ok());
    }

    #[test]
    fn line_period_must_fit_the_timer() {
        let derive = |clock| DisplayGeometry::derive(VideoStandard::Pal, 128, 96, clock, 0);
        assert_eq!(derive(1_100_000_000), Err(BeginError::ClockTooFast));
        assert_eq!(derive(u32::MAX), Err(BeginError::ClockTooFast));
        assert_eq!(derive(1_000_000_000).unwrap().samples_per_line, 63_999);
        assert_eq!(us_to_cycles(64.0, 1_100_000_000), u16::MAX);
    }

    #[test]
    fn cycle_conversion_floors_then_subtracts_one() {
        assert_eq!(us_to_cycles(12.0, CLOCK), 191);
        assert_eq!(us_to_cycles(4.7, 1_193_182), 4);
        assert_eq!(us_to_cycles(0.0, CLOCK), 0);
    }

    #[test]
    fn millis_follow_frame_count() {
        let g = DisplayGeometry::derive(VideoStandard::Ntsc, 128, 96, CLOCK, 3).unwrap();
        assert_eq!(g.frames_to_millis(60), 999);
        let g = DisplayGeometry::derive(VideoStandard::Pal, 128, 96, CLOCK, 3).unwrap();
        assert_eq!(g.frames_to_millis(50), 998);
    }

    #[test]
    fn standard_from_mode_number() {
        assert_eq!(VideoStandard::try_from(0), Ok(VideoStandard::Ntsc));
        assert_eq!(VideoStandard::try_from(1), Ok(VideoStandard::Pal));
        assert_eq!(VideoStandard::try_from(9), Err(9));
    }
}
