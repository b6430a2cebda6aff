//! Property tests for the Bresenham rasterizer.
//!
//! These pin down the visiting contract: exactly `max(|dx|, |dy|) + 1`
//! pixels per segment, start first, end exactly on the target, with every
//! consecutive pair of visited pixels adjacent.

use proptest::prelude::*;
use terrapin::raster::line;

fn collect(x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<(i32, i32)> {
    let mut pts = Vec::new();
    line(x1, y1, x2, y2, |x, y| pts.push((x, y)));
    pts
}

fn coord() -> impl Strategy<Value = i32> {
    -500..500i32
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn visits_major_delta_plus_one_points(
        x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord()
    ) {
        let pts = collect(x1, y1, x2, y2);
        let expected = (x2 - x1).abs().max((y2 - y1).abs()) + 1;

        prop_assert_eq!(pts.len(), expected as usize);
        prop_assert_eq!(pts[0], (x1, y1));
        prop_assert_eq!(*pts.last().unwrap(), (x2, y2));
    }

    #[test]
    fn consecutive_points_are_adjacent(
        x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord()
    ) {
        let pts = collect(x1, y1, x2, y2);
        for pair in pts.windows(2) {
            let (ax, ay) = pair[0];
            let (bx, by) = pair[1];
            let step = (bx - ax).abs().max((by - ay).abs());
            prop_assert_eq!(step, 1, "visited pixels must advance by exactly one step");
        }
    }

    #[test]
    fn dominant_axis_is_monotonic(
        x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord()
    ) {
        let pts = collect(x1, y1, x2, y2);
        let dx = (x2 - x1).abs();
        let dy = (y2 - y1).abs();
        if dx >= dy {
            let sx = (x2 - x1).signum();
            for pair in pts.windows(2) {
                prop_assert_eq!(pair[1].0 - pair[0].0, sx);
            }
        } else {
            let sy = (y2 - y1).signum();
            for pair in pts.windows(2) {
                prop_assert_eq!(pair[1].1 - pair[0].1, sy);
            }
        }
    }
}

#[test]
fn degenerate_segment_visits_exactly_one_point() {
    assert_eq!(collect(7, 7, 7, 7), vec![(7, 7)]);
    assert_eq!(collect(0, 0, 0, 0), vec![(0, 0)]);
    assert_eq!(collect(-12, 300, -12, 300), vec![(-12, 300)]);
}

#[test]
fn perfect_diagonal_steps_both_axes() {
    assert_eq!(
        collect(0, 0, 3, -3),
        vec![(0, 0), (1, -1), (2, -2), (3, -3)]
    );
}
