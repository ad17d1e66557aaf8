//! Property-based invariant tests for the frame buffer.
//!
//! 1. A pixel written inside the buffer reads back with that color.
//! 2. Writes outside the buffer change nothing.
//! 3. Inverting twice restores the original contents.
//! 4. `fill` makes every pixel equal.
//! 5. Shifting by at least the resolution clears the buffer.
//! 6. Lines light both endpoints and stay inside their bounding box.
//! 7. Filled rectangles light exactly their clipped footprint.
//! 8. Lines with any `i32` endpoints stay inside their bounding box.

use proptest::prelude::*;
use tvout::{Color, Direction, FrameBuffer};

// ── Helpers ─────────────────────────────────────────────────────────────

const W: u16 = 64;
const H: u16 = 40;

fn point() -> impl Strategy<Value = (i32, i32)> {
    (0..W as i32, 0..H as i32)
}

fn any_point() -> impl Strategy<Value = (i32, i32)> {
    (-100i32..200, -100i32..200)
}

fn noise() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec(point(), 0..64)
}

fn buffer_with(points: &[(i32, i32)]) -> FrameBuffer {
    let fb = FrameBuffer::allocate(W, H).unwrap();
    for &(x, y) in points {
        fb.set_pixel(x, y, Color::White);
    }
    fb
}

fn lit(fb: &FrameBuffer) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..H as i32 {
        for x in 0..W as i32 {
            if fb.get_pixel(x, y) == Color::White {
                out.push((x, y));
            }
        }
    }
    out
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Pixel access
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn set_then_get(points in noise(), (x, y) in point(), white in any::<bool>()) {
        let fb = buffer_with(&points);
        let color = Color::from_bit(white);
        fb.set_pixel(x, y, color);
        prop_assert_eq!(fb.get_pixel(x, y), color);
    }

    #[test]
    fn out_of_range_writes_are_ignored(points in noise(), (x, y) in any_point()) {
        prop_assume!(x < 0 || y < 0 || x >= W as i32 || y >= H as i32);
        let fb = buffer_with(&points);
        let before = fb.to_bytes();
        fb.set_pixel(x, y, Color::Invert);
        prop_assert_eq!(fb.to_bytes(), before);
        prop_assert_eq!(fb.get_pixel(x, y), Color::Black);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-4. Whole-buffer operations
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invert_is_an_involution(points in noise()) {
        let fb = buffer_with(&points);
        let before = lit(&fb);
        fb.fill(Color::Invert);
        prop_assert_eq!(lit(&fb).len(), (W as usize * H as usize) - before.len());
        fb.fill(Color::Invert);
        prop_assert_eq!(lit(&fb), before);
    }

    #[test]
    fn fill_is_uniform(points in noise(), white in any::<bool>()) {
        let fb = buffer_with(&points);
        let color = Color::from_bit(white);
        fb.fill(color);
        for y in 0..H as i32 {
            for x in 0..W as i32 {
                prop_assert_eq!(fb.get_pixel(x, y), color);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Shifting
// ═════════════════════════════════════════════════════════════════════════

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

proptest! {
    #[test]
    fn shifting_past_the_edge_clears(points in noise(), dir in direction(), extra in 0u16..50) {
        let fb = buffer_with(&points);
        let span = match dir {
            Direction::Up | Direction::Down => H,
            Direction::Left | Direction::Right => W,
        };
        fb.shift(span + extra, dir);
        prop_assert!(lit(&fb).is_empty());
    }

    #[test]
    fn shifting_moves_pixels((x, y) in point(), dir in direction(), d in 0u16..8) {
        let fb = buffer_with(&[(x, y)]);
        fb.shift(d, dir);
        let d = d as i32;
        let (nx, ny) = match dir {
            Direction::Up => (x, y - d),
            Direction::Down => (x, y + d),
            Direction::Left => (x - d, y),
            Direction::Right => (x + d, y),
        };
        let inside = nx >= 0 && ny >= 0 && nx < W as i32 && ny < H as i32;
        let expected: Vec<(i32, i32)> = if inside { vec![(nx, ny)] } else { vec![] };
        prop_assert_eq!(lit(&fb), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6-7. Shapes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lines_hit_both_endpoints((x0, y0) in point(), (x1, y1) in point()) {
        let fb = FrameBuffer::allocate(W, H).unwrap();
        fb.draw_line(x0, y0, x1, y1, Color::White);
        prop_assert_eq!(fb.get_pixel(x0, y0), Color::White);
        prop_assert_eq!(fb.get_pixel(x1, y1), Color::White);
        for (x, y) in lit(&fb) {
            prop_assert!(x >= x0.min(x1) && x <= x0.max(x1));
            prop_assert!(y >= y0.min(y1) && y <= y0.max(y1));
        }
    }

    #[test]
    fn filled_rect_covers_its_clipped_footprint(
        (x, y) in any_point(),
        w in 0u16..80,
        h in 0u16..60,
    ) {
        let fb = FrameBuffer::allocate(W, H).unwrap();
        fb.draw_rect(x, y, w, h, Color::White, Some(Color::White));
        let cols = (x.max(0)..(x + w as i32).min(W as i32)).len();
        let rows = (y.max(0)..(y + h as i32).min(H as i32)).len();
        prop_assert_eq!(lit(&fb).len(), cols * rows);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Extreme coordinates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wild_lines_stay_in_their_box(
        x0 in any::<i32>(),
        y0 in any::<i32>(),
        x1 in any::<i32>(),
        y1 in any::<i32>(),
    ) {
        let fb = FrameBuffer::allocate(W, H).unwrap();
        fb.draw_line(x0, y0, x1, y1, Color::White);
        for (x, y) in lit(&fb) {
            prop_assert!(x >= x0.min(x1) && x <= x0.max(x1));
            prop_assert!(y >= y0.min(y1) && y <= y0.max(y1));
        }
    }

    #[test]
    fn wild_shapes_never_escape_the_buffer(
        x in any::<i32>(),
        y in any::<i32>(),
        w in any::<u16>(),
        h in any::<u16>(),
    ) {
        let fb = FrameBuffer::allocate(W, H).unwrap();
        fb.draw_rect(x, y, w, h, Color::White, Some(Color::White));
        let cols = (x.max(0) as i64..(x as i64 + w as i64).min(W as i64)).count();
        let rows = (y.max(0) as i64..(y as i64 + h as i64).min(H as i64)).count();
        prop_assert_eq!(lit(&fb).len(), cols * rows);

        let fb = FrameBuffer::allocate(W, H).unwrap();
        fb.draw_circle(x, y, h % 512, Color::White, None);
        fb.bitmap(x, y, &[0xFF; 8], 0, 8, 8);
        let reach = (h % 512) as i64;
        for (px, py) in lit(&fb) {
            let (dx, dy) = (px as i64 - x as i64, py as i64 - y as i64);
            prop_assert!(dx.abs() <= reach.max(7) && dy.abs() <= reach.max(7));
        }
    }
}
