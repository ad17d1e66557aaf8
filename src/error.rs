use core::fmt;

/// Why `begin` refused to start video output.
///
/// Nothing is started when one of these is returned: the line timer stays
/// off and no hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginError {
    /// Zero width/height, or a width that is not a whole number of bytes.
    InvalidResolution,
    /// More rows than the standard has displayable scan lines.
    TooManyLines,
    /// The row cannot be shifted out inside the active video window.
    TooWide,
    /// The engine-owned frame buffer could not be allocated.
    OutOfMemory,
    /// The caller-supplied buffer is shorter than `ceil(x/8) * y` bytes.
    BufferTooSmall,
    /// One scan line takes more clock cycles than the line timer can count.
    ClockTooFast,
}

impl BeginError {
    /// Numeric status for callers that want the classic non-zero return code.
    pub fn code(self) -> u8 {
        match self {
            BeginError::InvalidResolution => 1,
            BeginError::TooManyLines => 2,
            BeginError::TooWide => 3,
            BeginError::OutOfMemory => 4,
            BeginError::BufferTooSmall => 5,
            BeginError::ClockTooFast => 6,
        }
    }
}

impl fmt::Display for BeginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeginError::InvalidResolution => write!(f, "invalid resolution"),
            BeginError::TooManyLines => write!(f, "more rows than displayable scan lines"),
            BeginError::TooWide => write!(f, "row does not fit the active video window"),
            BeginError::OutOfMemory => write!(f, "frame buffer allocation failed"),
            BeginError::BufferTooSmall => write!(f, "supplied frame buffer too small"),
            BeginError::ClockTooFast => write!(f, "line period exceeds the timer range"),
        }
    }
}

/// Why a tone request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneError {
    ZeroFrequency,
    /// Durations are counted in video frames, so the engine must be running.
    VideoStopped,
    /// The shared line timer would have to toggle faster than once per line.
    ExceedsLineRate,
    /// No prescaler brings the compare value into the timer's range.
    OutOfRange,
}

impl fmt::Display for ToneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToneError::ZeroFrequency => write!(f, "frequency is zero"),
            ToneError::VideoStopped => write!(f, "video engine not running"),
            ToneError::ExceedsLineRate => write!(f, "frequency exceeds half the line rate"),
            ToneError::OutOfRange => write!(f, "frequency outside the tone timer range"),
        }
    }
}
