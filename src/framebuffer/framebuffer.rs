//! Frame buffer storage and pixel access, plus the `embedded-graphics` target
use alloc::{sync::Arc, vec::Vec};
use core::sync::atomic::{AtomicU8, Ordering};

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};

use crate::framebuffer::color::Color;

#[derive(Clone)]
enum Storage {
    /// Allocated by the engine at `begin`; freed once every handle is dropped.
    Owned(Arc<[AtomicU8]>),
    /// Supplied by the application.
    Static(&'static [AtomicU8]),
}

/// A 1-bit-per-pixel, MSB-first, row-major bitmap.
///
/// Cloning is cheap and yields a second handle onto the same pixels; the
/// line engine keeps one handle, the main-thread facade keeps another.
#[derive(Clone)]
pub struct FrameBuffer {
    storage: Storage,
    width: u16,
    height: u16,
    stride: usize,
}

impl FrameBuffer {
    /// Bytes needed for a `width` x `height` buffer.
    pub fn bytes_needed(width: u16, height: u16) -> usize {
        (width as usize).div_ceil(8) * height as usize
    }

    /// Allocate a zeroed buffer, or `None` if the heap cannot satisfy it.
    pub fn allocate(width: u16, height: u16) -> Option<Self> {
        let len = Self::bytes_needed(width, height);
        let mut bytes: Vec<AtomicU8> = Vec::new();
        bytes.try_reserve_exact(len).ok()?;
        bytes.extend((0..len).map(|_| AtomicU8::new(0)));

        Some(Self {
            storage: Storage::Owned(Arc::from(bytes)),
            width,
            height,
            stride: (width as usize).div_ceil(8),
        })
    }

    /// Wrap caller-owned memory. Returns `None` if `bytes` is too short.
    pub fn from_static(width: u16, height: u16, bytes: &'static [AtomicU8]) -> Option<Self> {
        if bytes.len() < Self::bytes_needed(width, height) {
            return None;
        }
        Some(Self {
            storage: Storage::Static(bytes),
            width,
            height,
            stride: (width as usize).div_ceil(8),
        })
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn bytes(&self) -> &[AtomicU8] {
        let bytes: &[AtomicU8] = match &self.storage {
            Storage::Owned(arc) => arc,
            Storage::Static(slice) => slice,
        };
        &bytes[..self.stride * self.height as usize]
    }

    /// One row of packed pixels; empty when `y` is out of range.
    #[inline]
    pub fn row(&self, y: u16) -> &[AtomicU8] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.stride;
        &self.bytes()[start..start + self.stride]
    }

    /// Copy of the packed pixels, row-major.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes().iter().map(|b| b.load(Ordering::Relaxed)).collect()
    }

    /// True when both handles share the same pixel storage.
    pub fn shares_storage_with(&self, other: &FrameBuffer) -> bool {
        core::ptr::eq(self.bytes().as_ptr(), other.bytes().as_ptr())
    }

    #[inline]
    pub(crate) fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let index = y as usize * self.stride + (x as usize >> 3);
        Some((index, 0x80 >> (x & 7)))
    }

    /// Apply `color` to the bits of byte `index` selected by `mask`.
    #[inline]
    pub(crate) fn apply(&self, index: usize, mask: u8, color: Color) {
        let byte = &self.bytes()[index];
        match color {
            Color::Black => byte.fetch_and(!mask, Ordering::Relaxed),
            Color::White => byte.fetch_or(mask, Ordering::Relaxed),
            Color::Invert => byte.fetch_xor(mask, Ordering::Relaxed),
        };
    }

    #[inline]
    pub(crate) fn load(&self, index: usize) -> u8 {
        self.bytes()[index].load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn store(&self, index: usize, value: u8) {
        self.bytes()[index].store(value, Ordering::Relaxed);
    }

    /// Valid pixel bits of the last byte in each row.
    #[inline]
    pub(crate) fn tail_mask(&self) -> u8 {
        match self.width & 7 {
            0 => 0xFF,
            bits => !(0xFF >> bits),
        }
    }

    /// Set a pixel; coordinates outside the buffer are ignored.
    pub fn set_pixel(&self, x: i32, y: i32, color: Color) {
        if let Some((index, mask)) = self.locate(x, y) {
            self.apply(index, mask, color);
        }
    }

    /// Read a pixel; coordinates outside the buffer read as `Black`.
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        match self.locate(x, y) {
            Some((index, mask)) => Color::from_bit(self.load(index) & mask != 0),
            None => Color::Black,
        }
    }

    /// Set every pixel, or flip every pixel for `Invert`.
    pub fn fill(&self, color: Color) {
        for byte in self.bytes() {
            match color {
                Color::Black => byte.store(0x00, Ordering::Relaxed),
                Color::White => byte.store(0xFF, Ordering::Relaxed),
                Color::Invert => {
                    byte.fetch_xor(0xFF, Ordering::Relaxed);
                }
            }
        }
    }
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("owned", &matches!(self.storage, Storage::Owned(_)))
            .finish()
    }
}

// Implement DrawTarget for embedded-graphics
impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.set_pixel(x, y, color.into());
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if let Some(bottom_right) = area.bottom_right() {
            for y in area.top_left.y..=bottom_right.y {
                self.draw_row(y, area.top_left.x, bottom_right.x, color.into());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.into());
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}
