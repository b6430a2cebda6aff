//! Integer line rasterization.
//!
//! Classic error-accumulator Bresenham: step one pixel at a time along the
//! dominant axis (horizontal when `|dx| >= |dy|`), accumulate the minor-axis
//! delta into an error term seeded at half the dominant delta, and carry the
//! minor axis whenever the error reaches the dominant delta.
//!
//! The visitor is invoked for every pixel of the segment, in order from
//! start to end, both endpoints inclusive: exactly `max(|dx|, |dy|) + 1`
//! calls. A degenerate segment (both deltas zero) still visits its single
//! start pixel.

/// Visit every pixel on the segment from `(x1, y1)` to `(x2, y2)`.
pub fn line(x1: i32, y1: i32, x2: i32, y2: i32, mut visit: impl FnMut(i32, i32)) {
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = (x2 - x1).signum();
    let sy = (y2 - y1).signum();

    let mut px = x1;
    let mut py = y1;
    visit(px, py);

    if dx >= dy {
        let mut err = dx >> 1;
        for _ in 0..dx {
            err += dy;
            if err >= dx {
                err -= dx;
                py += sy;
            }
            px += sx;
            visit(px, py);
        }
    } else {
        let mut err = dy >> 1;
        for _ in 0..dy {
            err += dx;
            if err >= dy {
                err -= dy;
                px += sx;
            }
            py += sy;
            visit(px, py);
        }
    }
}
