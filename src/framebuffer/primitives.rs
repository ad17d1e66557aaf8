use alloc::vec;

use crate::framebuffer::{Color, Direction, FrameBuffer};

/// Rendering primitives. Everything clips to the buffer; nothing reports
/// out-of-range input.
impl FrameBuffer {
    /// Draw an inclusive horizontal span `[x0, x1]` on row `line`.
    pub fn draw_row(&self, line: i32, x0: i32, x1: i32, color: Color) {
        if line < 0 || line >= self.height() as i32 {
            return;
        }
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let lo = lo.max(0);
        let hi = hi.min(self.width() as i32 - 1);
        if lo > hi {
            return;
        }

        let base = line as usize * self.stride();
        let first = lo as usize >> 3;
        let last = hi as usize >> 3;
        let left_mask = 0xFFu8 >> (lo & 7);
        let right_mask = !(0x7Fu8 >> (hi & 7));

        if first == last {
            self.apply(base + first, left_mask & right_mask, color);
            return;
        }
        self.apply(base + first, left_mask, color);
        for index in first + 1..last {
            self.apply(base + index, 0xFF, color);
        }
        self.apply(base + last, right_mask, color);
    }

    /// Draw an inclusive vertical span `[y0, y1]` in column `column`.
    pub fn draw_column(&self, column: i32, y0: i32, y1: i32, color: Color) {
        if column < 0 || column >= self.width() as i32 {
            return;
        }
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        let lo = lo.max(0);
        let hi = hi.min(self.height() as i32 - 1);
        if lo > hi {
            return;
        }

        let mask = 0x80u8 >> (column & 7);
        let mut index = lo as usize * self.stride() + (column as usize >> 3);
        for _ in lo..=hi {
            self.apply(index, mask, color);
            index += self.stride();
        }
    }

    /// Straight line, both endpoints included.
    ///
    /// One pixel per step along the longer axis, rounded to the nearest
    /// pixel on the other. Only the steps that land on the buffer are
    /// visited, so far-off endpoints cost nothing extra.
    pub fn draw_line(&self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        if y0 == y1 {
            self.draw_row(y0, x0, x1, color);
            return;
        }
        if x0 == x1 {
            self.draw_column(x0, y0, y1, color);
            return;
        }

        let x_major = (x1 as i64 - x0 as i64).abs() >= (y1 as i64 - y0 as i64).abs();
        // (major, minor) pairs, ordered along the major axis.
        let (mut a, mut b) = if x_major {
            ((x0 as i64, y0 as i64), (x1 as i64, y1 as i64))
        } else {
            ((y0 as i64, x0 as i64), (y1 as i64, x1 as i64))
        };
        if a.0 > b.0 {
            core::mem::swap(&mut a, &mut b);
        }
        let (major_len, minor_len) = if x_major {
            (self.width() as i64, self.height() as i64)
        } else {
            (self.height() as i64, self.width() as i64)
        };

        let run = (b.0 - a.0) as i128;
        let rise = (b.1 - a.1) as i128;
        for t in a.0.max(0)..=b.0.min(major_len - 1) {
            // Round half up: floor((2n + d) / 2d).
            let n = (t - a.0) as i128 * rise;
            let m = a.1 + (2 * n + run).div_euclid(2 * run) as i64;
            if m < 0 || m >= minor_len {
                continue;
            }
            let (x, y) = if x_major { (t, m) } else { (m, t) };
            self.set_pixel(x as i32, y as i32, color);
        }
    }

    /// Whether the inclusive box `[x0, x1] x [y0, y1]` overlaps the buffer.
    fn touches(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> bool {
        x1 >= 0 && y1 >= 0 && x0 < self.width() as i64 && y0 < self.height() as i64
    }

    /// Rectangle covering `w` x `h` pixels from `(x, y)`.
    ///
    /// The outline is drawn in `color`; with `fill` the `(w-2)*(h-2)`
    /// interior is painted too. Each pixel is touched once, so `Invert`
    /// behaves.
    pub fn draw_rect(&self, x: i32, y: i32, w: u16, h: u16, color: Color, fill: Option<Color>) {
        if w == 0 || h == 0 {
            return;
        }
        let right = x as i64 + w as i64 - 1;
        let bottom = y as i64 + h as i64 - 1;
        if !self.touches(x as i64, y as i64, right, bottom) {
            return;
        }
        // Both corners now lie within a u16 of the buffer.
        let (right, bottom) = (right as i32, bottom as i32);

        if let Some(fill) = fill {
            if w > 2 {
                for row in (y + 1).max(0)..bottom.min(self.height() as i32) {
                    self.draw_row(row, x + 1, right - 1, fill);
                }
            }
        }

        self.draw_row(y, x, right, color);
        if h == 1 {
            return;
        }
        self.draw_row(bottom, x, right, color);
        if h > 2 {
            self.draw_column(x, y + 1, bottom - 1, color);
            if w > 1 {
                self.draw_column(right, y + 1, bottom - 1, color);
            }
        }
    }

    /// Midpoint circle of `radius` around `(cx, cy)`, optionally filled.
    pub fn draw_circle(&self, cx: i32, cy: i32, radius: u16, color: Color, fill: Option<Color>) {
        let r = radius as i32;
        let (ox, oy, span) = (cx as i64, cy as i64, r as i64);
        if !self.touches(ox - span, oy - span, ox + span, oy + span) {
            return;
        }
        if r == 0 {
            self.set_pixel(cx, cy, color);
            return;
        }

        // First-octant points (x <= y), starting at the top.
        let mut octant = vec![(0, r)];
        let (mut x, mut y) = (0i32, r);
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;
            if x > y {
                break;
            }
            octant.push((x, y));
        }

        if let Some(fill) = fill {
            // Smallest outline |dx| on each row offset; the interior lies
            // strictly inside it.
            let mut inner = vec![i32::MAX; r as usize + 1];
            for &(x, y) in &octant {
                inner[y as usize] = inner[y as usize].min(x);
                inner[x as usize] = inner[x as usize].min(y);
            }
            for dy in -r..=r {
                let n = inner[dy.unsigned_abs() as usize];
                if n != i32::MAX && n > 0 {
                    self.draw_row(cy + dy, cx - n + 1, cx + n - 1, fill);
                }
            }
        }

        for &(x, y) in &octant {
            let mut points = [(0i32, 0i32); 8];
            let mut count = 0;
            for p in [
                (x, y),
                (-x, y),
                (x, -y),
                (-x, -y),
                (y, x),
                (-y, x),
                (y, -x),
                (-y, -x),
            ] {
                if !points[..count].contains(&p) {
                    points[count] = p;
                    count += 1;
                }
            }
            for &(dx, dy) in &points[..count] {
                self.set_pixel(cx + dx, cy + dy, color);
            }
        }
    }

    /// Move the whole picture `distance` pixels; vacated pixels become black.
    pub fn shift(&self, distance: u16, direction: Direction) {
        if distance == 0 {
            return;
        }
        let distance = distance as usize;
        let stride = self.stride();
        let height = self.height() as usize;

        match direction {
            Direction::Up | Direction::Down => {
                if distance >= height {
                    self.fill(Color::Black);
                    return;
                }
                let offset = distance * stride;
                let len = height * stride;
                if direction == Direction::Up {
                    for index in 0..len {
                        let value = if index + offset < len { self.load(index + offset) } else { 0 };
                        self.store(index, value);
                    }
                } else {
                    for index in (0..len).rev() {
                        let value = if index >= offset { self.load(index - offset) } else { 0 };
                        self.store(index, value);
                    }
                }
            }
            Direction::Left | Direction::Right => {
                if distance >= self.width() as usize {
                    self.fill(Color::Black);
                    return;
                }
                let bytes = distance >> 3;
                let bits = (distance & 7) as u32;
                let tail = self.tail_mask();
                for line in 0..height {
                    let base = line * stride;
                    // Padding bits of the last byte never carry pixels.
                    let read = |i: isize| -> u8 {
                        if i < 0 || i as usize >= stride {
                            0
                        } else if i as usize == stride - 1 {
                            self.load(base + i as usize) & tail
                        } else {
                            self.load(base + i as usize)
                        }
                    };
                    if direction == Direction::Left {
                        for i in 0..stride {
                            let src = (i + bytes) as isize;
                            let hi = read(src) << bits;
                            let lo = if bits == 0 { 0 } else { read(src + 1) >> (8 - bits) };
                            self.store(base + i, hi | lo);
                        }
                    } else {
                        for i in (0..stride).rev() {
                            let src = i as isize - bytes as isize;
                            let lo = read(src) >> bits;
                            let hi = if bits == 0 { 0 } else { read(src - 1) << (8 - bits) };
                            self.store(base + i, hi | lo);
                        }
                    }
                    let last = base + stride - 1;
                    self.store(last, self.load(last) & tail);
                }
            }
        }
    }

    /// Copy a packed bitmap (same bit order as the buffer) to `(x, y)`.
    ///
    /// Reading starts at `src[offset]`. A `width` of 0 takes the width from
    /// the next source byte; a `lines` of 0 then takes the height from the
    /// byte after it. Source bits overwrite the destination; pixels beyond
    /// the end of `src` are left alone.
    pub fn bitmap(&self, x: i32, y: i32, src: &[u8], offset: usize, width: u8, lines: u8) {
        let mut cursor = offset;
        let width = match width {
            0 => match src.get(cursor) {
                Some(&w) => {
                    cursor += 1;
                    w
                }
                None => return,
            },
            w => w,
        };
        let lines = match lines {
            0 => match src.get(cursor) {
                Some(&h) => {
                    cursor += 1;
                    h
                }
                None => return,
            },
            h => h,
        };

        let right = x as i64 + width as i64 - 1;
        let bottom = y as i64 + lines as i64 - 1;
        if width == 0 || lines == 0 || !self.touches(x as i64, y as i64, right, bottom) {
            return;
        }

        let src_stride = (width as usize).div_ceil(8);
        for row in 0..lines as usize {
            let start = cursor + row * src_stride;
            let Some(bits) = src.get(start..start + src_stride) else {
                return;
            };
            for col in 0..width as usize {
                let on = bits[col >> 3] & (0x80 >> (col & 7)) != 0;
                self.set_pixel(x + col as i32, y + row as i32, Color::from_bit(on));
            }
        }
    }
}
